use crate::error::AppError;
use std::env;

const DEFAULT_MATCHES_TABLE: &str = "matches";
const DEFAULT_PROFILES_TABLE: &str = "profiles";
const DEFAULT_REQUESTS_PER_SECOND: u32 = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub anon_key: String,
    /// Signed-in user's JWT. Requests fall back to the anon key without it.
    pub access_token: Option<String>,
    pub matches_table: String,
    pub profiles_table: String,
    pub requests_per_second: u32,
    pub timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup (the process environment in
    /// production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = lookup("SUPABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("SUPABASE_URL not found in .env file".to_string())
            })?;

        let anon_key = lookup("SUPABASE_ANON_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                AppError::ConfigError("SUPABASE_ANON_KEY not found in .env file".to_string())
            })?;

        let access_token = lookup("SUPABASE_ACCESS_TOKEN").filter(|v| !v.trim().is_empty());

        let matches_table = lookup("MATCH_STATS_MATCHES_TABLE")
            .unwrap_or_else(|| DEFAULT_MATCHES_TABLE.to_string());
        let profiles_table = lookup("MATCH_STATS_PROFILES_TABLE")
            .unwrap_or_else(|| DEFAULT_PROFILES_TABLE.to_string());

        let requests_per_second = match lookup("MATCH_STATS_REQUESTS_PER_SECOND") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(AppError::ConfigError(format!(
                        "MATCH_STATS_REQUESTS_PER_SECOND must be a positive integer, got '{}'",
                        raw
                    )))
                }
            },
            None => DEFAULT_REQUESTS_PER_SECOND,
        };

        let timeout_secs = match lookup("MATCH_STATS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                AppError::ConfigError(format!(
                    "MATCH_STATS_TIMEOUT_SECS must be a number of seconds, got '{}'",
                    raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            supabase_url: supabase_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token,
            matches_table,
            profiles_table,
            requests_per_second,
            timeout_secs,
        })
    }

    /// Token sent in the `Authorization` header.
    pub fn bearer_token(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.anon_key)
    }
}
