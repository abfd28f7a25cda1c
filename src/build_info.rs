//! Build metadata read from the site's git repository

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::Path;

/// Length of the abbreviated commit hash shown in the footer
pub const SHORT_HASH_LEN: usize = 7;

/// Commit the site was built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub commit_hash: String,
    pub commit_date: DateTime<Utc>,
}

impl BuildInfo {
    /// Read `HEAD` of the repository containing `dir`.
    ///
    /// Returns `Ok(None)` when `dir` is not inside a git repository or the
    /// repository has no commits yet.
    pub fn discover(dir: &Path) -> Result<Option<Self>> {
        let repo = match gix::discover(dir) {
            Ok(repo) => repo,
            Err(e) => {
                tracing::warn!("No git repository found for {:?}: {}", dir, e);
                return Ok(None);
            }
        };

        let commit = match repo.head_commit() {
            Ok(commit) => commit,
            Err(e) => {
                tracing::warn!("Repository has no HEAD commit: {}", e);
                return Ok(None);
            }
        };

        let time = commit.time()?;
        let commit_date = DateTime::from_timestamp(time.seconds, 0)
            .ok_or_else(|| anyhow!("Commit time {} is out of range", time.seconds))?;

        Ok(Some(Self {
            commit_hash: commit.id.to_string(),
            commit_date,
        }))
    }

    /// Abbreviated commit hash
    pub fn short_hash(&self) -> &str {
        let end = self.commit_hash.len().min(SHORT_HASH_LEN);
        &self.commit_hash[..end]
    }
}
