//! Canonical job representation and paging results.

use serde::{Deserialize, Serialize};

/// A job listing normalized from an upstream record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct NormalizedJob {
    /// Stable identifier (empty when nothing usable was present upstream)
    pub id: String,

    /// Upstream's own identifier, stringified
    pub provider_id: String,

    /// Job title (empty when missing)
    pub title: String,

    pub company: Option<String>,
    pub category: Option<String>,
    pub job_type: Option<String>,

    /// Where candidates are required to be located
    pub location: Option<String>,

    pub url: Option<String>,

    /// Publication date exactly as upstream formatted it
    pub published_at: Option<String>,

    /// Job description, may contain markup
    pub description: Option<String>,

    /// Tags, falling back to skills upstream
    #[serde(default)]
    pub tags: Vec<String>,

    /// Always false when produced by the normalizer
    #[serde(default)]
    pub is_favorite: bool,
}

impl NormalizedJob {
    /// Whether `id` refers to this job, either by canonical or provider id.
    pub fn matches_id(&self, id: &str) -> bool {
        self.id == id || self.provider_id == id
    }
}

/// Normalized jobs extracted from a single upstream payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobBatch {
    pub items: Vec<NormalizedJob>,

    /// Upstream-reported total, or the raw list length as fallback.
    /// Kept signed: a negative upstream count is passed through.
    pub total: i64,
}

/// One locally sliced page of jobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageResult {
    pub items: Vec<NormalizedJob>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}
