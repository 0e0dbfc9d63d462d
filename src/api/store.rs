use crate::error::AppError;

use super::models::{MatchRecord, Profile};

/// Read side of the match store.
///
/// `fetch_user_matches` returns the user's whole history in one call; there
/// is no pagination. `fetch_profiles` resolves a batch of registered ids in
/// one query and silently omits ids it does not know.
pub trait MatchStore {
    fn fetch_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError>;

    fn fetch_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError>;
}

impl<S: MatchStore + ?Sized> MatchStore for &S {
    fn fetch_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError> {
        (**self).fetch_user_matches(user_id)
    }

    fn fetch_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        (**self).fetch_profiles(ids)
    }
}

impl<S: MatchStore + ?Sized> MatchStore for Box<S> {
    fn fetch_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError> {
        (**self).fetch_user_matches(user_id)
    }

    fn fetch_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        (**self).fetch_profiles(ids)
    }
}
