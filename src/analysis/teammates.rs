use crate::api::models::{MatchRecord, Profile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;

use super::outcome::{average, longest_streaks, win_rate, Outcome};
use super::slots::{player_key, team_slots, PlayerKey, Seat};

#[derive(Debug, Clone, Serialize)]
pub struct PartnershipEntry {
    pub date: DateTime<Utc>,
    pub match_id: String,
    pub outcome: Outcome,
    pub user_won: bool,
    /// User's own score plus the teammate's
    pub combined_score: u32,
}

/// Only win streaks are tracked for partnerships.
#[derive(Debug, Clone, Serialize)]
pub struct TeammateStats {
    pub teammate_id: String,
    pub teammate_name: String,
    pub teammate_avatar: Option<String>,
    pub is_guest: bool,
    pub matches_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub win_rate: f64,
    pub total_combined_score: u32,
    pub avg_combined_score: f64,
    pub current_win_streak: u32,
    pub longest_win_streak: u32,
    pub first_played: Option<DateTime<Utc>>,
    pub last_played: Option<DateTime<Utc>>,
    pub history: Vec<PartnershipEntry>,
}

impl TeammateStats {
    fn from_history(key: PlayerKey, mut history: Vec<PartnershipEntry>) -> Self {
        history.sort_by_key(|entry| entry.date);

        let matches_played = history.len() as u32;
        let wins = history.iter().filter(|e| e.outcome == Outcome::Win).count() as u32;
        let losses = history.iter().filter(|e| e.outcome == Outcome::Loss).count() as u32;
        let draws = matches_played - wins - losses;
        let total_combined_score = history.iter().map(|e| e.combined_score).sum();

        let current_win_streak = history
            .iter()
            .rev()
            .take_while(|e| e.outcome == Outcome::Win)
            .count() as u32;
        let (longest_win_streak, _) = longest_streaks(history.iter().map(|e| e.outcome));

        TeammateStats {
            teammate_id: key.id,
            teammate_name: key.name,
            teammate_avatar: None,
            is_guest: key.is_guest,
            matches_played,
            wins,
            losses,
            draws,
            win_rate: win_rate(wins, matches_played),
            total_combined_score,
            avg_combined_score: average(total_combined_score, matches_played),
            current_win_streak,
            longest_win_streak,
            first_played: history.first().map(|e| e.date),
            last_played: history.last().map(|e| e.date),
            history,
        }
    }

    pub fn apply_profile(&mut self, profile: &Profile) {
        if let Some(name) = profile.name() {
            self.teammate_name = name.to_string();
        }
        self.teammate_avatar = profile.avatar_url.clone();
    }
}

struct Partnership {
    key: PlayerKey,
    history: Vec<PartnershipEntry>,
}

pub struct TeammateTracker {
    user_id: String,
    partners: Vec<Partnership>,
    index: HashMap<String, usize>,
}

impl TeammateTracker {
    pub fn new(user_id: &str) -> Self {
        TeammateTracker {
            user_id: user_id.to_string(),
            partners: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn add_match(&mut self, record: &MatchRecord) -> bool {
        let Some(seat) = Seat::locate(record, &self.user_id) else {
            return false;
        };
        let user_score = record.score(seat.slot);

        for slot in team_slots(seat.team) {
            if slot == seat.slot || !record.is_occupied(slot) {
                continue;
            }
            let key = player_key(record, slot);
            if key.id == self.user_id {
                continue;
            }
            let entry = PartnershipEntry {
                date: record.date(),
                match_id: record.id.clone(),
                outcome: seat.outcome,
                user_won: seat.outcome.is_win(),
                combined_score: user_score + record.score(slot),
            };
            self.add_partnership(key, entry);
        }

        true
    }

    fn add_partnership(&mut self, key: PlayerKey, entry: PartnershipEntry) {
        let idx = *self.index.entry(key.id.clone()).or_insert_with(|| {
            self.partners.push(Partnership {
                key,
                history: Vec::new(),
            });
            self.partners.len() - 1
        });
        self.partners[idx].history.push(entry);
    }

    pub fn into_stats(self) -> Vec<TeammateStats> {
        let mut stats: Vec<TeammateStats> = self
            .partners
            .into_iter()
            .map(|p| TeammateStats::from_history(p.key, p.history))
            .collect();

        stats.sort_by(|a, b| b.matches_played.cmp(&a.matches_played));
        stats
    }
}

/// Record with every teammate the user has partnered with.
pub fn calculate_teammate_stats(user_id: &str, matches: &[MatchRecord]) -> Vec<TeammateStats> {
    let mut tracker = TeammateTracker::new(user_id);
    for record in matches {
        tracker.add_match(record);
    }
    tracker.into_stats()
}
