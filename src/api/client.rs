use crate::config::Config;
use crate::error::AppError;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoints;
use super::models::{self, MatchRecord, Profile};
use super::store::MatchStore;

const USER_AGENT: &str = concat!("match_stats/", env!("CARGO_PKG_VERSION"));
const MAX_RETRIES: u32 = 3;
const RETRY_BACKOFF: Duration = Duration::from_secs(2);

pub struct SupabaseClient {
    config: Config,
    agent: ureq::Agent,
    rate_limiter: DefaultDirectRateLimiter,
    /// The nth 429 retry waits `retry_backoff * n`.
    retry_backoff: Duration,
}

impl SupabaseClient {
    pub fn new(config: Config) -> Self {
        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(per_second));
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build();

        SupabaseClient {
            config,
            agent,
            rate_limiter,
            retry_backoff: RETRY_BACKOFF,
        }
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Blocks until the client-side quota allows another request.
    fn wait_for_quota(&self) {
        while let Err(not_until) = self.rate_limiter.check() {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            thread::sleep(wait);
        }
    }

    fn execute_request(&self, url: &str, query: &[(&str, String)]) -> Result<String, AppError> {
        let mut retry_count = 0;

        loop {
            self.wait_for_quota();

            let mut request = self
                .agent
                .get(url)
                .set("apikey", &self.config.anon_key)
                .set("Authorization", &format!("Bearer {}", self.config.bearer_token()))
                .set("Accept", "application/json");
            for (key, value) in query {
                request = request.query(key, value);
            }

            match request.call() {
                Ok(resp) => {
                    return resp
                        .into_string()
                        .map_err(|e| AppError::HttpError(e.to_string()));
                }
                Err(ureq::Error::Status(429, _)) => {
                    if retry_count >= MAX_RETRIES {
                        return Err(AppError::RateLimited);
                    }
                    let wait = self.retry_backoff * (retry_count + 1);
                    warn!(
                        "Rate limited by match store, waiting {}ms before retry",
                        wait.as_millis()
                    );
                    thread::sleep(wait);
                    retry_count += 1;
                }
                Err(ureq::Error::Status(code @ (401 | 403), resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    return Err(AppError::Unauthorized(format!("HTTP {}: {}", code, body)));
                }
                Err(ureq::Error::Status(code, resp)) => {
                    let body = resp.into_string().unwrap_or_default();
                    return Err(AppError::ApiError(format!("HTTP {}: {}", code, body)));
                }
                Err(e) => {
                    return Err(AppError::HttpError(e.to_string()));
                }
            }
        }
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, AppError> {
        let body = self.execute_request(url, query)?;
        serde_json::from_str(&body).map_err(|e| AppError::JsonError(e.to_string()))
    }

    pub fn get_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError> {
        let url = endpoints::table_url(&self.config.supabase_url, &self.config.matches_table);
        let query = [
            ("select", "*".to_string()),
            ("or", endpoints::user_slot_filter(user_id)),
            ("order", "created_at.desc".to_string()),
        ];

        let rows: Vec<Value> = self.get_json(&url, &query)?;
        let matches = models::records_from_rows(rows);
        debug!("Fetched {} matches for {}", matches.len(), user_id);
        Ok(matches)
    }

    pub fn get_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = endpoints::table_url(&self.config.supabase_url, &self.config.profiles_table);
        let query = [
            ("select", endpoints::PROFILE_COLUMNS.to_string()),
            ("id", endpoints::id_in_filter(ids)),
        ];

        let profiles: Vec<Profile> = self.get_json(&url, &query)?;
        debug!("Resolved {} of {} profiles", profiles.len(), ids.len());
        Ok(profiles)
    }
}

impl MatchStore for SupabaseClient {
    fn fetch_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError> {
        self.get_user_matches(user_id)
    }

    fn fetch_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        self.get_profiles(ids)
    }
}
