//! # match_stats
//!
//! Relationship statistics for a player of a 2v2 table game, computed from
//! their full match history.
//!
//! - **analysis**: pure folds (head-to-head, teammates, trend, streaks, records)
//! - **api**: match store trait, Supabase REST client, local JSON export store
//! - **calculator**: store-backed reports that degrade to empty on failure
//! - **display**: terminal tables
//! - **config**: environment configuration

pub mod analysis;
pub mod api;
pub mod calculator;
pub mod config;
pub mod display;
pub mod error;

pub use calculator::{PlayerReport, RelationshipStats};
pub use error::AppError;
