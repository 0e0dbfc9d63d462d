use crate::api::models::MatchRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::{win_rate, Outcome};
use super::slots::seated_matches;

/// Running totals as of one match.
#[derive(Debug, Clone, Serialize)]
pub struct PerformanceTrend {
    pub date: DateTime<Utc>,
    pub match_id: String,
    pub outcome: Outcome,
    pub cumulative_wins: u32,
    pub cumulative_matches: u32,
    pub win_rate: f64,
    pub score: u32,
    pub opponent_score: u32,
}

pub fn calculate_performance_trend(user_id: &str, matches: &[MatchRecord]) -> Vec<PerformanceTrend> {
    let mut cumulative_wins = 0u32;

    seated_matches(user_id, matches)
        .into_iter()
        .enumerate()
        .map(|(i, (record, seat))| {
            if seat.outcome.is_win() {
                cumulative_wins += 1;
            }
            let cumulative_matches = i as u32 + 1;
            PerformanceTrend {
                date: record.date(),
                match_id: record.id.clone(),
                outcome: seat.outcome,
                cumulative_wins,
                cumulative_matches,
                win_rate: win_rate(cumulative_wins, cumulative_matches),
                score: seat.team_score,
                opponent_score: seat.opponent_score,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::duel;

    #[test]
    fn test_running_totals_in_date_order() {
        let matches = vec![
            duel("m3", 2, 4, 9, 2),
            duel("m1", 0, 10, 2, 1),
            duel("m2", 1, 3, 3, 0),
        ];

        let trend = calculate_performance_trend("u1", &matches);
        let ids: Vec<&str> = trend.iter().map(|t| t.match_id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);

        let wins: Vec<u32> = trend.iter().map(|t| t.cumulative_wins).collect();
        let played: Vec<u32> = trend.iter().map(|t| t.cumulative_matches).collect();
        assert_eq!(wins, vec![1, 1, 1]);
        assert_eq!(played, vec![1, 2, 3]);
        assert_eq!(trend[0].win_rate, 100.0);
        assert_eq!(trend[1].win_rate, 50.0);
        assert_eq!(trend[2].score, 4);
        assert_eq!(trend[2].opponent_score, 9);
    }

    #[test]
    fn test_other_players_matches_ignored() {
        assert!(calculate_performance_trend("stranger", &[duel("m1", 0, 1, 0, 1)]).is_empty());
    }
}
