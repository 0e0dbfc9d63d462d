//! Personal bests over the user's history.
//!
//! Every category is scanned oldest to newest, so ties keep the earliest
//! match. Rates need a minimum sample before they count.

use crate::api::models::MatchRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::{round_one_decimal, Outcome};
use super::slots::seated_matches;

/// Throws needed before a hit rate counts as a record.
pub const MIN_THROWS_FOR_RATE: u32 = 5;
/// Catch attempts needed before a catch rate counts as a record.
pub const MIN_CATCH_ATTEMPTS_FOR_RATE: u32 = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record<T> {
    pub value: T,
    pub match_id: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakRecord {
    pub length: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub start_match_id: String,
    pub end_match_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PersonalRecords {
    pub highest_score: Option<Record<u32>>,
    pub most_sinks: Option<Record<u32>>,
    pub most_goals: Option<Record<u32>>,
    /// Percent, one decimal
    pub best_hit_rate: Option<Record<f64>>,
    /// Percent, one decimal
    pub best_catch_rate: Option<Record<f64>>,
    /// Seconds
    pub fastest_win: Option<Record<u32>>,
    pub longest_win_streak: Option<StreakRecord>,
}

fn record_at<T>(value: T, record: &MatchRecord) -> Record<T> {
    Record {
        value,
        match_id: record.id.clone(),
        date: record.date(),
    }
}

/// Replace `best` only when `value` strictly beats it under `better`.
fn keep_best<T: Copy>(
    best: &mut Option<Record<T>>,
    value: T,
    record: &MatchRecord,
    better: impl Fn(T, T) -> bool,
) {
    let replace = match best {
        Some(current) => better(value, current.value),
        None => true,
    };
    if replace {
        *best = Some(record_at(value, record));
    }
}

fn rate(successes: u32, attempts: u32) -> f64 {
    if attempts == 0 {
        0.0
    } else {
        round_one_decimal(successes as f64 / attempts as f64 * 100.0)
    }
}

pub fn calculate_personal_records(user_id: &str, matches: &[MatchRecord]) -> PersonalRecords {
    let mut records = PersonalRecords::default();

    let mut run: Option<StreakRecord> = None;

    for (record, seat) in seated_matches(user_id, matches) {
        let line = record.stat_line(seat.slot);

        keep_best(&mut records.highest_score, line.score, record, |a, b| a > b);
        keep_best(&mut records.most_sinks, line.sinks, record, |a, b| a > b);
        keep_best(&mut records.most_goals, line.goals, record, |a, b| a > b);

        if line.throws >= MIN_THROWS_FOR_RATE {
            let hit_rate = rate(line.hits, line.throws);
            keep_best(&mut records.best_hit_rate, hit_rate, record, |a, b| a > b);
        }

        let attempts = line.catch_attempts();
        if attempts >= MIN_CATCH_ATTEMPTS_FOR_RATE {
            let catch_rate = rate(line.catches, attempts);
            keep_best(&mut records.best_catch_rate, catch_rate, record, |a, b| a > b);
        }

        if seat.outcome == Outcome::Win {
            if let Some(duration) = record.match_duration.filter(|&d| d > 0) {
                keep_best(&mut records.fastest_win, duration, record, |a, b| a < b);
            }

            let current = run.get_or_insert_with(|| StreakRecord {
                length: 0,
                start_date: record.date(),
                end_date: record.date(),
                start_match_id: record.id.clone(),
                end_match_id: record.id.clone(),
            });
            current.length += 1;
            current.end_date = record.date();
            current.end_match_id = record.id.clone();

            let beats_best = records
                .longest_win_streak
                .as_ref()
                .map_or(true, |best| current.length > best.length);
            if beats_best {
                records.longest_win_streak = Some(current.clone());
            }
        } else {
            run = None;
        }
    }

    records
}
