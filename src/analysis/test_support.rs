use crate::api::models::{MatchRecord, MatchSetup, PlayerStatLine};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;

pub fn day(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap() + Duration::days(n)
}

pub struct MatchBuilder {
    record: MatchRecord,
}

impl MatchBuilder {
    pub fn new(id: &str, on_day: i64) -> Self {
        MatchBuilder {
            record: MatchRecord {
                id: id.to_string(),
                created_at: day(on_day),
                match_start_time: None,
                match_duration: None,
                match_setup: Some(MatchSetup {
                    player_names: vec![None; 4],
                }),
                user_slot_map: HashMap::new(),
                player_stats: HashMap::new(),
                winner_team: None,
            },
        }
    }

    fn name(mut self, slot: u8, name: &str) -> Self {
        if let Some(setup) = self.record.match_setup.as_mut() {
            setup.player_names[(slot - 1) as usize] = Some(name.to_string());
        }
        self
    }

    pub fn user(mut self, slot: u8, user_id: &str, name: &str, score: u32) -> Self {
        self.record
            .user_slot_map
            .insert(slot.to_string(), Some(user_id.to_string()));
        self.score(slot, score).name(slot, name)
    }

    pub fn guest(self, slot: u8, name: &str, score: u32) -> Self {
        self.score(slot, score).name(slot, name)
    }

    pub fn score(mut self, slot: u8, score: u32) -> Self {
        self.record
            .player_stats
            .entry(slot.to_string())
            .or_default()
            .get_or_insert_with(PlayerStatLine::default)
            .score = score;
        self
    }

    pub fn stats(mut self, slot: u8, line: PlayerStatLine) -> Self {
        self.record.player_stats.insert(slot.to_string(), Some(line));
        self
    }

    pub fn winner(mut self, team: u8) -> Self {
        self.record.winner_team = Some(team);
        self
    }

    pub fn duration(mut self, secs: u32) -> Self {
        self.record.match_duration = Some(secs);
        self
    }

    pub fn build(self) -> MatchRecord {
        self.record
    }
}

/// User `u1` in slot 1 with guest partner Pat, against registered `u3`
/// and guest Gus. Each side's points go to its first slot.
pub fn duel(id: &str, on_day: i64, user_points: u32, opponent_points: u32, winner: u8) -> MatchRecord {
    MatchBuilder::new(id, on_day)
        .user(1, "u1", "Una", user_points)
        .guest(2, "Pat", 0)
        .user(3, "u3", "Tre", opponent_points)
        .guest(4, "Gus", 0)
        .winner(winner)
        .build()
}
