use crate::api::models::{MatchRecord, Profile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::outcome::{average, current_streak, longest_streaks, win_rate, Outcome};
use super::slots::{opposing_team, player_key, team_slots, PlayerKey, Seat};

/// One shared match against an opponent.
#[derive(Debug, Clone, Serialize)]
pub struct MatchupEntry {
    pub date: DateTime<Utc>,
    pub match_id: String,
    pub outcome: Outcome,
    /// False for draws as well as losses
    pub user_won: bool,
    pub user_score: u32,
    pub opponent_score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHeadStats {
    pub opponent_id: String,
    pub opponent_name: String,
    pub opponent_avatar: Option<String>,
    pub is_guest: bool,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    /// Percentage, 0-100
    pub win_rate: f64,
    pub total_points_scored: u32,
    pub total_points_conceded: u32,
    pub avg_points_scored: f64,
    pub avg_points_conceded: f64,
    /// Positive for a run of wins, negative for losses
    pub current_streak: i32,
    pub longest_win_streak: u32,
    pub longest_loss_streak: u32,
    pub first_played: Option<DateTime<Utc>>,
    pub last_played: Option<DateTime<Utc>>,
    /// Oldest first
    pub history: Vec<MatchupEntry>,
}

impl HeadToHeadStats {
    fn from_history(key: PlayerKey, mut history: Vec<MatchupEntry>) -> Self {
        history.sort_by_key(|entry| entry.date);

        let outcomes: Vec<Outcome> = history.iter().map(|e| e.outcome).collect();
        let count = |wanted: Outcome| outcomes.iter().filter(|&&o| o == wanted).count() as u32;
        let wins = count(Outcome::Win);
        let losses = count(Outcome::Loss);
        let draws = count(Outcome::Draw);
        let matches_played = history.len() as u32;

        let total_points_scored = history.iter().map(|e| e.user_score).sum();
        let total_points_conceded = history.iter().map(|e| e.opponent_score).sum();
        let (longest_win_streak, longest_loss_streak) = longest_streaks(outcomes.iter().copied());

        HeadToHeadStats {
            opponent_id: key.id,
            opponent_name: key.name,
            opponent_avatar: None,
            is_guest: key.is_guest,
            matches_played,
            wins,
            losses,
            draws,
            win_rate: win_rate(wins, matches_played),
            total_points_scored,
            total_points_conceded,
            avg_points_scored: average(total_points_scored, matches_played),
            avg_points_conceded: average(total_points_conceded, matches_played),
            current_streak: current_streak(&outcomes),
            longest_win_streak,
            longest_loss_streak,
            first_played: history.first().map(|e| e.date),
            last_played: history.last().map(|e| e.date),
            history,
        }
    }

    /// Replace the in-match name with the opponent's profile details.
    pub fn apply_profile(&mut self, profile: &Profile) {
        if let Some(name) = profile.name() {
            self.opponent_name = name.to_string();
        }
        self.opponent_avatar = profile.avatar_url.clone();
    }
}

struct OpponentHistory {
    key: PlayerKey,
    history: Vec<MatchupEntry>,
}

/// Folds matches into per-opponent histories, remembering the order in
/// which opponents were first met.
pub struct HeadToHeadTracker {
    user_id: String,
    opponents: Vec<OpponentHistory>,
    index: HashMap<String, usize>,
}

impl HeadToHeadTracker {
    pub fn new(user_id: &str) -> Self {
        HeadToHeadTracker {
            user_id: user_id.to_string(),
            opponents: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Returns false when the user did not play in `record`.
    pub fn add_match(&mut self, record: &MatchRecord) -> bool {
        let Some(seat) = Seat::locate(record, &self.user_id) else {
            return false;
        };

        for slot in team_slots(opposing_team(seat.team)) {
            if !record.is_occupied(slot) {
                continue;
            }
            let key = player_key(record, slot);
            // Bad rows can list the user on both sides
            if key.id == self.user_id {
                continue;
            }
            let entry = MatchupEntry {
                date: record.date(),
                match_id: record.id.clone(),
                outcome: seat.outcome,
                user_won: seat.outcome.is_win(),
                user_score: seat.team_score,
                opponent_score: seat.opponent_score,
            };
            self.add_encounter(key, entry);
        }

        true
    }

    fn add_encounter(&mut self, key: PlayerKey, entry: MatchupEntry) {
        let idx = match self.index.get(&key.id) {
            Some(&idx) => idx,
            None => {
                self.index.insert(key.id.clone(), self.opponents.len());
                self.opponents.push(OpponentHistory {
                    key,
                    history: Vec::new(),
                });
                self.opponents.len() - 1
            }
        };

        let opponent = &mut self.opponents[idx];
        // Two guest slots with the same name count once per match
        if opponent.history.iter().any(|e| e.match_id == entry.match_id) {
            return;
        }
        opponent.history.push(entry);
    }

    /// Most frequent opponents first; equal counts keep first-met order.
    pub fn into_stats(self) -> Vec<HeadToHeadStats> {
        let mut stats: Vec<HeadToHeadStats> = self
            .opponents
            .into_iter()
            .map(|o| HeadToHeadStats::from_history(o.key, o.history))
            .collect();

        stats.sort_by(|a, b| b.matches_played.cmp(&a.matches_played));
        stats
    }
}

/// Head-to-head record against every opponent the user has faced.
pub fn calculate_head_to_head(user_id: &str, matches: &[MatchRecord]) -> Vec<HeadToHeadStats> {
    let mut tracker = HeadToHeadTracker::new(user_id);
    for record in matches {
        tracker.add_match(record);
    }
    tracker.into_stats()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::{duel, MatchBuilder};
    use pretty_assertions::assert_eq;

    fn find<'a>(stats: &'a [HeadToHeadStats], id: &str) -> &'a HeadToHeadStats {
        stats.iter().find(|s| s.opponent_id == id).unwrap()
    }

    #[test]
    fn test_win_and_loss_against_same_opponent() {
        let matches = vec![duel("m1", 0, 15, 10, 1), duel("m2", 1, 8, 12, 2)];

        let stats = calculate_head_to_head("u1", &matches);
        let tre = find(&stats, "u3");

        assert_eq!(tre.matches_played, 2);
        assert_eq!(tre.wins, 1);
        assert_eq!(tre.losses, 1);
        assert_eq!(tre.draws, 0);
        assert_eq!(tre.win_rate, 50.0);
        assert_eq!(tre.total_points_scored, 23);
        assert_eq!(tre.total_points_conceded, 22);
        assert_eq!(tre.avg_points_scored, 11.5);
        assert_eq!(tre.current_streak, -1);
        assert_eq!(tre.longest_win_streak, 1);
        assert_eq!(tre.longest_loss_streak, 1);
    }

    #[test]
    fn test_both_opposing_slots_become_opponents() {
        let stats = calculate_head_to_head("u1", &[duel("m1", 0, 5, 3, 1)]);

        let ids: Vec<&str> = stats.iter().map(|s| s.opponent_id.as_str()).collect();
        assert_eq!(ids, vec!["u3", "guest_gus"]);
        assert!(find(&stats, "guest_gus").is_guest);
        assert_eq!(find(&stats, "guest_gus").opponent_name, "Gus");
    }

    #[test]
    fn test_draw_counts_as_played_only() {
        let stats = calculate_head_to_head("u1", &[duel("m1", 0, 5, 5, 0)]);
        let tre = find(&stats, "u3");

        assert_eq!(tre.matches_played, 1);
        assert_eq!(tre.wins, 0);
        assert_eq!(tre.losses, 0);
        assert_eq!(tre.draws, 1);
        assert!(!tre.history[0].user_won);
        assert_eq!(tre.current_streak, 0);
    }

    #[test]
    fn test_history_sorted_and_streak_from_latest() {
        // Supplied newest first, the way the store returns them
        let matches = vec![
            duel("m4", 3, 9, 2, 1),
            duel("m3", 2, 9, 2, 1),
            duel("m2", 1, 1, 9, 2),
            duel("m1", 0, 9, 1, 1),
        ];

        let stats = calculate_head_to_head("u1", &matches);
        let tre = find(&stats, "u3");

        let order: Vec<&str> = tre.history.iter().map(|e| e.match_id.as_str()).collect();
        assert_eq!(order, vec!["m1", "m2", "m3", "m4"]);
        assert_eq!(tre.current_streak, 2);
        assert_eq!(tre.longest_win_streak, 2);
        assert_eq!(tre.first_played, Some(matches[3].date()));
        assert_eq!(tre.last_played, Some(matches[0].date()));
    }

    #[test]
    fn test_sorted_by_matches_played_with_stable_ties() {
        let matches = vec![
            MatchBuilder::new("a", 0)
                .user(1, "u1", "Una", 3)
                .user(3, "rare", "Rae", 1)
                .winner(1)
                .build(),
            MatchBuilder::new("b", 1)
                .user(1, "u1", "Una", 3)
                .user(3, "often", "Oft", 1)
                .guest(4, "Zed", 0)
                .winner(1)
                .build(),
            MatchBuilder::new("c", 2)
                .user(2, "u1", "Una", 3)
                .user(4, "often", "Oft", 1)
                .winner(1)
                .build(),
        ];

        let stats = calculate_head_to_head("u1", &matches);
        let ids: Vec<&str> = stats.iter().map(|s| s.opponent_id.as_str()).collect();
        assert_eq!(ids, vec!["often", "rare", "guest_zed"]);
    }

    #[test]
    fn test_user_on_team_two() {
        let m = MatchBuilder::new("m", 0)
            .guest(1, "Ann", 4)
            .guest(2, "Bo", 4)
            .user(3, "u1", "Una", 6)
            .guest(4, "Cy", 1)
            .winner(1)
            .build();

        let stats = calculate_head_to_head("u1", &[m]);
        let ann = find(&stats, "guest_ann");
        assert_eq!(ann.losses, 1);
        assert_eq!(ann.history[0].user_score, 7);
        assert_eq!(ann.history[0].opponent_score, 8);
    }

    #[test]
    fn test_matches_without_user_are_skipped() {
        let mut tracker = HeadToHeadTracker::new("nobody");
        assert!(!tracker.add_match(&duel("m1", 0, 1, 0, 1)));
        assert!(tracker.into_stats().is_empty());
    }

    #[test]
    fn test_empty_slots_are_not_opponents() {
        let one_v_one = MatchBuilder::new("m", 0)
            .user(1, "u1", "Una", 5)
            .guest(3, "Solo", 2)
            .winner(1)
            .build();

        let stats = calculate_head_to_head("u1", &[one_v_one]);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].opponent_id, "guest_solo");
    }

    #[test]
    fn test_user_never_listed_as_own_opponent() {
        let mirrored = MatchBuilder::new("m", 0)
            .user(1, "u1", "Una", 5)
            .guest(2, "Pat", 1)
            .user(3, "u1", "Una", 4)
            .guest(4, "Gus", 2)
            .winner(1)
            .build();

        let stats = calculate_head_to_head("u1", &[mirrored]);
        let ids: Vec<&str> = stats.iter().map(|s| s.opponent_id.as_str()).collect();
        assert_eq!(ids, vec!["guest_gus"]);
    }

    #[test]
    fn test_apply_profile_overrides_name() {
        let mut stats = calculate_head_to_head("u1", &[duel("m1", 0, 5, 3, 1)]);
        let profile = Profile {
            id: "u3".to_string(),
            display_name: Some("Trevor".to_string()),
            username: None,
            avatar_url: Some("https://cdn/t.png".to_string()),
        };
        stats[0].apply_profile(&profile);

        assert_eq!(stats[0].opponent_name, "Trevor");
        assert_eq!(stats[0].opponent_avatar.as_deref(), Some("https://cdn/t.png"));
    }
}
