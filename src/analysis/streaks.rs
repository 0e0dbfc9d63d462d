use crate::api::models::MatchRecord;
use serde::Serialize;

use super::outcome::{current_streak, longest_streaks, Outcome};
use super::slots::seated_matches;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakType {
    Win,
    Loss,
    #[default]
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StreakInfo {
    /// Positive for wins, negative for losses
    pub current_streak: i32,
    pub current_streak_type: StreakType,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
}

/// Streaks across the user's whole history, regardless of opponent.
pub fn calculate_streak_info(user_id: &str, matches: &[MatchRecord]) -> StreakInfo {
    let outcomes: Vec<Outcome> = seated_matches(user_id, matches)
        .into_iter()
        .map(|(_, seat)| seat.outcome)
        .collect();

    let (longest_win_streak, longest_loss_streak) = longest_streaks(outcomes.iter().copied());
    let current = current_streak(&outcomes);
    let current_streak_type = match current {
        n if n > 0 => StreakType::Win,
        n if n < 0 => StreakType::Loss,
        _ => StreakType::None,
    };

    StreakInfo {
        current_streak: current,
        current_streak_type,
        longest_win_streak,
        longest_loss_streak,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::duel;

    fn history(results: &[u8]) -> Vec<MatchRecord> {
        results
            .iter()
            .enumerate()
            .map(|(i, &winner)| duel(&format!("m{}", i), i as i64, 1, 1, winner))
            .collect()
    }

    #[test]
    fn test_trailing_wins() {
        let info = calculate_streak_info("u1", &history(&[2, 1, 1, 1]));
        assert_eq!(info.current_streak, 3);
        assert_eq!(info.current_streak_type, StreakType::Win);
    }

    #[test]
    fn test_trailing_losses_negative() {
        let info = calculate_streak_info("u1", &history(&[1, 2, 2]));
        assert_eq!(info.current_streak, -2);
        assert_eq!(info.current_streak_type, StreakType::Loss);
        assert_eq!(info.longest_loss_streak, 2);
    }

    #[test]
    fn test_longest_runs() {
        // W W L W W W
        let info = calculate_streak_info("u1", &history(&[1, 1, 2, 1, 1, 1]));
        assert_eq!(info.longest_win_streak, 3);
        assert_eq!(info.longest_loss_streak, 1);
    }

    #[test]
    fn test_latest_draw_means_no_streak() {
        let info = calculate_streak_info("u1", &history(&[1, 1, 0]));
        assert_eq!(info.current_streak, 0);
        assert_eq!(info.current_streak_type, StreakType::None);
        assert_eq!(info.longest_win_streak, 2);
    }

    #[test]
    fn test_no_matches_is_default() {
        assert_eq!(calculate_streak_info("u1", &[]), StreakInfo::default());
    }
}
