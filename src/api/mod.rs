pub mod client;
pub mod endpoints;
pub mod local;
pub mod models;
pub mod store;

pub use client::SupabaseClient;
pub use local::LocalStore;
pub use models::{MatchRecord, Profile};
pub use store::MatchStore;
