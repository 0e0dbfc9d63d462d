//! Store-backed entry points for the five reports.
//!
//! Each report fetches the user's full history, folds it, and resolves
//! profile details for registered players. A store failure is logged and
//! the report comes back empty, so "fetch failed" renders like "no data".

use crate::analysis::{
    calculate_head_to_head, calculate_performance_trend, calculate_personal_records,
    calculate_streak_info, calculate_teammate_stats, HeadToHeadStats, PerformanceTrend,
    PersonalRecords, StreakInfo, TeammateStats,
};
use crate::api::models::{MatchRecord, Profile};
use crate::api::store::MatchStore;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, error};

#[derive(Debug, Clone, Default, Serialize)]
pub struct PlayerReport {
    pub user_id: String,
    pub head_to_head: Vec<HeadToHeadStats>,
    pub teammates: Vec<TeammateStats>,
    pub trend: Vec<PerformanceTrend>,
    pub streaks: StreakInfo,
    pub records: PersonalRecords,
}

pub struct RelationshipStats<S> {
    store: S,
}

impl<S: MatchStore> RelationshipStats<S> {
    pub fn new(store: S) -> Self {
        RelationshipStats { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_matches(&self, user_id: &str, report: &str) -> Option<Vec<MatchRecord>> {
        match self.store.fetch_user_matches(user_id) {
            Ok(matches) => {
                debug!("{}: folding {} matches for {}", report, matches.len(), user_id);
                Some(matches)
            }
            Err(e) => {
                error!(user_id = %user_id, report = %report, "Failed to fetch match history: {}", e);
                None
            }
        }
    }

    /// One batched lookup for the registered ids; guests are never sent.
    fn load_profiles<'a, I>(&self, ids: I, report: &str) -> Option<HashMap<String, Profile>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let ids: Vec<String> = ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            return Some(HashMap::new());
        }

        match self.store.fetch_profiles(&ids) {
            Ok(profiles) => Some(profiles.into_iter().map(|p| (p.id.clone(), p)).collect()),
            Err(e) => {
                error!(report = %report, "Failed to resolve {} profiles: {}", ids.len(), e);
                None
            }
        }
    }

    pub fn head_to_head(&self, user_id: &str) -> Vec<HeadToHeadStats> {
        let Some(matches) = self.load_matches(user_id, "head_to_head") else {
            return Vec::new();
        };
        let mut stats = calculate_head_to_head(user_id, &matches);

        let registered = stats
            .iter()
            .filter(|s| !s.is_guest)
            .map(|s| s.opponent_id.as_str());
        let Some(profiles) = self.load_profiles(registered, "head_to_head") else {
            return Vec::new();
        };

        for opponent in stats.iter_mut().filter(|s| !s.is_guest) {
            if let Some(profile) = profiles.get(&opponent.opponent_id) {
                opponent.apply_profile(profile);
            }
        }
        stats
    }

    pub fn teammate_stats(&self, user_id: &str) -> Vec<TeammateStats> {
        let Some(matches) = self.load_matches(user_id, "teammates") else {
            return Vec::new();
        };
        let mut stats = calculate_teammate_stats(user_id, &matches);

        let registered = stats
            .iter()
            .filter(|s| !s.is_guest)
            .map(|s| s.teammate_id.as_str());
        let Some(profiles) = self.load_profiles(registered, "teammates") else {
            return Vec::new();
        };

        for teammate in stats.iter_mut().filter(|s| !s.is_guest) {
            if let Some(profile) = profiles.get(&teammate.teammate_id) {
                teammate.apply_profile(profile);
            }
        }
        stats
    }

    pub fn performance_trend(&self, user_id: &str) -> Vec<PerformanceTrend> {
        self.load_matches(user_id, "trend")
            .map(|matches| calculate_performance_trend(user_id, &matches))
            .unwrap_or_default()
    }

    pub fn streak_info(&self, user_id: &str) -> StreakInfo {
        self.load_matches(user_id, "streaks")
            .map(|matches| calculate_streak_info(user_id, &matches))
            .unwrap_or_default()
    }

    pub fn personal_records(&self, user_id: &str) -> PersonalRecords {
        self.load_matches(user_id, "records")
            .map(|matches| calculate_personal_records(user_id, &matches))
            .unwrap_or_default()
    }

    /// All five reports. Each runs its own fetch, so one failing does not
    /// empty the others.
    pub fn full_report(&self, user_id: &str) -> PlayerReport {
        PlayerReport {
            user_id: user_id.to_string(),
            head_to_head: self.head_to_head(user_id),
            teammates: self.teammate_stats(user_id),
            trend: self.performance_trend(user_id),
            streaks: self.streak_info(user_id),
            records: self.personal_records(user_id),
        }
    }
}
