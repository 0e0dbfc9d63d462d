use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Treats an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Row of the `matches` table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchRecord {
    pub id: String,
    #[serde(alias = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "matchStartTime")]
    pub match_start_time: Option<DateTime<Utc>>,
    /// Seconds
    #[serde(default, alias = "matchDuration")]
    pub match_duration: Option<u32>,
    #[serde(default, alias = "matchSetup")]
    pub match_setup: Option<MatchSetup>,
    /// Slot ("1".."4") to registered user id; guests are null or absent.
    #[serde(default, alias = "userSlotMap", deserialize_with = "null_as_default")]
    pub user_slot_map: HashMap<String, Option<String>>,
    /// Slot to stats line; a null line reads as all zeros.
    #[serde(default, alias = "playerStats", deserialize_with = "null_as_default")]
    pub player_stats: HashMap<String, Option<PlayerStatLine>>,
    /// 1 or 2; 0 or null is a draw.
    #[serde(default, alias = "winnerTeam")]
    pub winner_team: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchSetup {
    #[serde(default, alias = "playerNames", deserialize_with = "null_as_default")]
    pub player_names: Vec<Option<String>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PlayerStatLine {
    #[serde(deserialize_with = "null_as_default")]
    pub score: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub throws: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub hits: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub catches: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub drops: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub sinks: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub goals: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub misses: u32,
}

impl PlayerStatLine {
    pub fn catch_attempts(&self) -> u32 {
        self.catches + self.drops
    }
}

impl MatchRecord {
    /// When the match was played: the recorded start time, else the row's
    /// creation time.
    pub fn date(&self) -> DateTime<Utc> {
        self.match_start_time.unwrap_or(self.created_at)
    }

    /// Registered user id in `slot`, ignoring null and blank entries.
    pub fn registered_user(&self, slot: u8) -> Option<&str> {
        self.user_slot_map
            .get(&slot.to_string())
            .and_then(|v| v.as_deref())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// Name entered for `slot` during match setup, if any.
    pub fn entered_name(&self, slot: u8) -> Option<&str> {
        let index = (slot as usize).checked_sub(1)?;
        self.match_setup
            .as_ref()
            .and_then(|setup| setup.player_names.get(index))
            .and_then(|name| name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn player_name(&self, slot: u8) -> String {
        self.entered_name(slot)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Player {}", slot))
    }

    /// Stats line for `slot`; a missing line reads as all zeros.
    pub fn stat_line(&self, slot: u8) -> PlayerStatLine {
        self.recorded_line(slot).cloned().unwrap_or_default()
    }

    fn recorded_line(&self, slot: u8) -> Option<&PlayerStatLine> {
        self.player_stats
            .get(&slot.to_string())
            .and_then(Option::as_ref)
    }

    pub fn score(&self, slot: u8) -> u32 {
        self.recorded_line(slot).map(|line| line.score).unwrap_or(0)
    }

    pub fn is_occupied(&self, slot: u8) -> bool {
        self.registered_user(slot).is_some()
            || self.entered_name(slot).is_some()
            || self.recorded_line(slot).is_some()
    }
}

// Row of the `profiles` table
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl Profile {
    pub fn name(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| self.username.as_deref().filter(|n| !n.trim().is_empty()))
    }
}

/// Converts raw rows one at a time, skipping rows that still fail after
/// field defaults so one corrupt record never drops the rest.
pub fn records_from_rows(rows: Vec<Value>) -> Vec<MatchRecord> {
    let total = rows.len();
    let records: Vec<MatchRecord> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(idx, row)| {
            let id = row.get("id").and_then(Value::as_str).map(str::to_string);
            match serde_json::from_value::<MatchRecord>(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(
                        "Skipping malformed match row {} (id {}): {}",
                        idx,
                        id.as_deref().unwrap_or("unknown"),
                        e
                    );
                    None
                }
            }
        })
        .collect();

    if records.len() < total {
        warn!("Kept {} of {} match rows", records.len(), total);
    }
    records
}

fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<MatchRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows: Vec<Value> = null_as_default(deserializer)?;
    Ok(records_from_rows(rows))
}

// Offline export read by `LocalStore`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MatchExport {
    #[serde(default, deserialize_with = "lenient_rows")]
    pub matches: Vec<MatchRecord>,
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_with_nulls_parses() {
        let raw = r#"{
            "id": "m1",
            "created_at": "2024-03-01T18:30:00+00:00",
            "match_setup": {"playerNames": ["Ann", null, "", "Dee"]},
            "user_slot_map": {"1": "user-a", "2": null},
            "player_stats": null,
            "winner_team": null
        }"#;
        let row: MatchRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(row.registered_user(1), Some("user-a"));
        assert_eq!(row.registered_user(2), None);
        assert_eq!(row.player_name(1), "Ann");
        assert_eq!(row.player_name(2), "Player 2");
        assert_eq!(row.player_name(3), "Player 3");
        assert_eq!(row.score(1), 0);
        assert!(row.player_stats.is_empty());
        assert_eq!(row.winner_team, None);
    }

    #[test]
    fn test_camel_case_aliases_accepted() {
        let raw = r#"{
            "id": "m2",
            "createdAt": "2024-03-01T18:30:00Z",
            "matchStartTime": "2024-03-01T18:00:00Z",
            "matchDuration": 420,
            "userSlotMap": {"3": "user-c"},
            "playerStats": {"3": {"score": 7, "throws": 10, "hits": 6}},
            "winnerTeam": 2
        }"#;
        let row: MatchRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(row.date().to_rfc3339(), "2024-03-01T18:00:00+00:00");
        assert_eq!(row.match_duration, Some(420));
        assert_eq!(row.stat_line(3).hits, 6);
        assert_eq!(row.stat_line(3).catches, 0);
        assert!(row.is_occupied(3));
        assert!(!row.is_occupied(4));
        assert_eq!(row.winner_team, Some(2));
    }

    #[test]
    fn test_null_stat_values_default_to_zero() {
        let raw = r#"{
            "id": "m3",
            "created_at": "2024-03-01T18:30:00Z",
            "player_stats": {"1": {"score": null, "throws": 6}, "2": null}
        }"#;
        let row: MatchRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(row.score(1), 0);
        assert_eq!(row.stat_line(1).throws, 6);
        assert_eq!(row.stat_line(2), PlayerStatLine::default());
        assert!(row.is_occupied(1));
        assert!(!row.is_occupied(2));
    }

    #[test]
    fn test_bad_rows_skipped_individually() {
        let rows: Vec<Value> = serde_json::from_str(
            r#"[
                {"id": "good", "created_at": "2024-03-01T18:30:00Z"},
                {"id": "no-date", "user_slot_map": {"1": "u1"}},
                {"id": "bad-winner", "created_at": "2024-03-01T18:30:00Z", "winner_team": "two"},
                {"id": "null-score", "created_at": "2024-03-02T18:30:00Z",
                 "player_stats": {"1": {"score": null}}}
            ]"#,
        )
        .unwrap();

        let ids: Vec<String> = records_from_rows(rows).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["good", "null-score"]);
    }

    #[test]
    fn test_profile_name_fallbacks() {
        let profile = Profile {
            id: "u1".to_string(),
            display_name: Some("  ".to_string()),
            username: Some("ace".to_string()),
            avatar_url: None,
        };
        assert_eq!(profile.name(), Some("ace"));
    }
}
