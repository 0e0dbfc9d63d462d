use crate::error::AppError;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::models::{MatchExport, MatchRecord, Profile};
use super::store::MatchStore;
use super::endpoints::SLOT_COUNT;

/// Match store backed by a JSON export on disk.
pub struct LocalStore {
    path: PathBuf,
    export: MatchExport,
}

impl LocalStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let export: MatchExport = serde_json::from_str(&content).map_err(|e| {
            AppError::JsonError(format!("Failed to parse {}: {}", path.display(), e))
        })?;

        debug!(
            "Loaded {} matches and {} profiles from {}",
            export.matches.len(),
            export.profiles.len(),
            path.display()
        );

        Ok(LocalStore { path, export })
    }

    pub fn from_export(export: MatchExport) -> Self {
        LocalStore {
            path: PathBuf::from("<memory>"),
            export,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MatchStore for LocalStore {
    fn fetch_user_matches(&self, user_id: &str) -> Result<Vec<MatchRecord>, AppError> {
        Ok(self
            .export
            .matches
            .iter()
            .filter(|m| (1..=SLOT_COUNT).any(|slot| m.registered_user(slot) == Some(user_id)))
            .cloned()
            .collect())
    }

    fn fetch_profiles(&self, ids: &[String]) -> Result<Vec<Profile>, AppError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        Ok(self
            .export
            .profiles
            .iter()
            .filter(|p| wanted.contains(p.id.as_str()))
            .cloned()
            .collect())
    }
}
