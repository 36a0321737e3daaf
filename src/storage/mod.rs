//! Storage abstractions for the favorites collaborator.
//!
//! Favorites belong to a single demo user. The job listing core never reads
//! or writes them; the HTTP surface layers `is_favorite` on top of core
//! results.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! └── favorites.json        # Favorite records, newest last
//! ```

pub mod local;

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::NormalizedJob;

// Re-export for convenience
pub use local::LocalStorage;

/// A favorited job with the time it was added.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FavoriteRecord {
    /// Snapshot of the job when it was favorited
    pub job: NormalizedJob,

    pub created_at: DateTime<Utc>,
}

/// Abstract favorites storage backend.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Store `job` as a favorite. Returns false if it already was one.
    async fn add(&self, job: NormalizedJob) -> Result<bool>;

    /// Remove a favorite by job id. Returns false if it was not stored.
    async fn remove(&self, job_id: &str) -> Result<bool>;

    /// Whether the job id is a favorite.
    async fn contains(&self, job_id: &str) -> Result<bool>;

    /// All favorites, newest first.
    async fn list(&self) -> Result<Vec<FavoriteRecord>>;

    /// Ids of all favorites.
    async fn ids(&self) -> Result<HashSet<String>> {
        Ok(self.list().await?.into_iter().map(|r| r.job.id).collect())
    }
}

/// Set `is_favorite` on every job whose id is in `ids`.
pub fn mark_favorites<'a>(
    jobs: impl IntoIterator<Item = &'a mut NormalizedJob>,
    ids: &HashSet<String>,
) {
    for job in jobs {
        job.is_favorite = ids.contains(&job.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_favorites() {
        let mut jobs = vec![
            NormalizedJob {
                id: "1".into(),
                ..NormalizedJob::default()
            },
            NormalizedJob {
                id: "2".into(),
                is_favorite: true,
                ..NormalizedJob::default()
            },
        ];
        let ids = HashSet::from(["1".to_string()]);
        mark_favorites(jobs.iter_mut(), &ids);
        assert!(jobs[0].is_favorite);
        assert!(!jobs[1].is_favorite);
    }
}
