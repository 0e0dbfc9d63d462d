//! Slot, team and player identity lookups shared by every report.
//!
//! Slots 1-2 are team 1 and slots 3-4 are team 2.

use crate::api::endpoints::SLOT_COUNT;
use crate::api::models::MatchRecord;

use super::outcome::Outcome;

pub const GUEST_PREFIX: &str = "guest_";

/// Slot the user occupied in `record`, if they played in it.
pub fn user_slot(record: &MatchRecord, user_id: &str) -> Option<u8> {
    (1..=SLOT_COUNT).find(|&slot| record.registered_user(slot) == Some(user_id))
}

pub fn team_for_slot(slot: u8) -> u8 {
    if slot <= 2 {
        1
    } else {
        2
    }
}

pub fn team_slots(team: u8) -> [u8; 2] {
    if team == 1 {
        [1, 2]
    } else {
        [3, 4]
    }
}

pub fn opposing_team(team: u8) -> u8 {
    if team == 1 {
        2
    } else {
        1
    }
}

/// Sum of the team's per-player scores; missing lines count as 0.
pub fn team_score(record: &MatchRecord, team: u8) -> u32 {
    team_slots(team).iter().map(|&slot| record.score(slot)).sum()
}

pub fn outcome_for_team(record: &MatchRecord, team: u8) -> Outcome {
    match record.winner_team {
        None | Some(0) => Outcome::Draw,
        Some(winner) if winner == team => Outcome::Win,
        Some(_) => Outcome::Loss,
    }
}

/// Stable identity of whoever sat in a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerKey {
    pub id: String,
    /// Name as entered for the match
    pub name: String,
    pub is_guest: bool,
}

pub fn player_key(record: &MatchRecord, slot: u8) -> PlayerKey {
    let name = record.player_name(slot);
    match record.registered_user(slot) {
        Some(id) => PlayerKey {
            id: id.to_string(),
            name,
            is_guest: false,
        },
        None => PlayerKey {
            id: guest_key(&name),
            name,
            is_guest: true,
        },
    }
}

/// Guest identity from a display name: lowercased, trimmed, and with each
/// whitespace run collapsed to `_`. Guests sharing a name share a key.
pub fn guest_key(name: &str) -> String {
    let normalized: Vec<String> = name.split_whitespace().map(str::to_lowercase).collect();
    format!("{}{}", GUEST_PREFIX, normalized.join("_"))
}

/// The user's side of a match they played in.
#[derive(Debug, Clone, Copy)]
pub struct Seat {
    pub slot: u8,
    pub team: u8,
    pub outcome: Outcome,
    pub team_score: u32,
    pub opponent_score: u32,
}

impl Seat {
    pub fn locate(record: &MatchRecord, user_id: &str) -> Option<Self> {
        let slot = user_slot(record, user_id)?;
        let team = team_for_slot(slot);
        Some(Seat {
            slot,
            team,
            outcome: outcome_for_team(record, team),
            team_score: team_score(record, team),
            opponent_score: team_score(record, opposing_team(team)),
        })
    }
}

/// Matches the user played, oldest first. Equal dates keep input order.
pub fn seated_matches<'a>(user_id: &str, matches: &'a [MatchRecord]) -> Vec<(&'a MatchRecord, Seat)> {
    let mut seated: Vec<(&MatchRecord, Seat)> = matches
        .iter()
        .filter_map(|record| Seat::locate(record, user_id).map(|seat| (record, seat)))
        .collect();
    seated.sort_by_key(|(record, _)| record.date());
    seated
}
