//! Pure folds over a user's match history. Nothing here touches storage.

pub mod head_to_head;
pub mod outcome;
pub mod records;
pub mod slots;
pub mod streaks;
pub mod teammates;
pub mod trend;

#[cfg(test)]
pub(crate) mod test_support;

pub use head_to_head::{calculate_head_to_head, HeadToHeadStats, MatchupEntry};
pub use outcome::Outcome;
pub use records::{calculate_personal_records, PersonalRecords, Record, StreakRecord};
pub use slots::{guest_key, player_key, user_slot, PlayerKey};
pub use streaks::{calculate_streak_info, StreakInfo, StreakType};
pub use teammates::{calculate_teammate_stats, PartnershipEntry, TeammateStats};
pub use trend::{calculate_performance_trend, PerformanceTrend};
