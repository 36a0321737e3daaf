// src/services/normalizer.rs

//! Maps raw upstream job records onto [`NormalizedJob`].
//!
//! Normalization never fails: missing or oddly typed fields degrade to
//! `None`, an empty string or an empty list. Candidate key orders are part of
//! the contract; the id order in particular keeps ids stable for favorites.

use serde_json::Value;

use crate::models::{NormalizedJob, RawRecord};
use crate::utils::fields::{first_present, scalar_text, to_text};

/// Candidate keys for the canonical id, in priority order.
pub const ID_KEYS: [&str; 5] = ["id", "job_id", "uuid", "slug", "url"];
pub const PROVIDER_ID_KEYS: [&str; 1] = ["id"];
pub const TAG_KEYS: [&str; 2] = ["tags", "skills"];

const TITLE_KEY: &str = "title";
const COMPANY_KEY: &str = "company_name";
const CATEGORY_KEY: &str = "category";
const JOB_TYPE_KEY: &str = "job_type";
const LOCATION_KEY: &str = "candidate_required_location";
const URL_KEY: &str = "url";
const PUBLISHED_KEY: &str = "publication_date";
const DESCRIPTION_KEY: &str = "description";

/// Normalize one raw upstream record.
pub fn normalize(raw: &RawRecord) -> NormalizedJob {
    let text_of = |keys: &[&str]| first_present(raw, keys).map(to_text).unwrap_or_default();
    let optional = |key: &str| raw.get(key).and_then(scalar_text);

    NormalizedJob {
        id: text_of(&ID_KEYS),
        provider_id: text_of(&PROVIDER_ID_KEYS),
        title: first_present(raw, &[TITLE_KEY])
            .and_then(scalar_text)
            .unwrap_or_default(),
        company: optional(COMPANY_KEY),
        category: optional(CATEGORY_KEY),
        job_type: optional(JOB_TYPE_KEY),
        location: optional(LOCATION_KEY),
        url: optional(URL_KEY),
        published_at: optional(PUBLISHED_KEY),
        description: optional(DESCRIPTION_KEY),
        tags: first_present(raw, &TAG_KEYS).map(tag_list).unwrap_or_default(),
        is_favorite: false,
    }
}

/// Turn a tags value into a list. A lone string counts as a single tag;
/// non-scalar list elements are dropped.
fn tag_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(scalar_text).collect(),
        Value::String(s) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn raw(value: Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_full_record() {
        let job = normalize(&raw(json!({
            "id": 1843201,
            "url": "https://remotive.com/remote-jobs/software-dev/rust-engineer-1843201",
            "title": "Rust Engineer",
            "company_name": "Ferrous Co",
            "category": "Software Development",
            "job_type": "full_time",
            "publication_date": "2025-09-01T10:12:00",
            "candidate_required_location": "Worldwide",
            "description": "<p>Write Rust.</p>",
            "tags": ["rust", "tokio"]
        })));

        assert_eq!(job.id, "1843201");
        assert_eq!(job.provider_id, "1843201");
        assert_eq!(job.title, "Rust Engineer");
        assert_eq!(job.company.as_deref(), Some("Ferrous Co"));
        assert_eq!(job.location.as_deref(), Some("Worldwide"));
        assert_eq!(job.published_at.as_deref(), Some("2025-09-01T10:12:00"));
        assert_eq!(job.description.as_deref(), Some("<p>Write Rust.</p>"));
        assert_eq!(job.tags, vec!["rust", "tokio"]);
        assert!(!job.is_favorite);
    }

    #[test]
    fn test_empty_record_degrades() {
        let job = normalize(&RawRecord::new());
        assert_eq!(job, NormalizedJob::default());
    }

    #[test]
    fn test_id_prefers_id_over_slug() {
        let job = normalize(&raw(json!({"id": 7, "slug": "seven"})));
        assert_eq!(job.id, "7");
    }

    #[test]
    fn test_id_fallback_chain() {
        let cases = [
            (json!({"job_id": "j-1", "uuid": "u-1"}), "j-1"),
            (json!({"id": 0, "uuid": "u-1", "slug": "s"}), "u-1"),
            (json!({"slug": "rust-dev", "url": "https://x/1"}), "rust-dev"),
            (json!({"url": "https://x/1"}), "https://x/1"),
            (json!({"id": null, "slug": ""}), ""),
        ];
        for (record, expected) in cases {
            assert_eq!(normalize(&raw(record)).id, expected);
        }
    }

    #[test]
    fn test_provider_id_only_from_id() {
        let job = normalize(&raw(json!({"job_id": "j-1"})));
        assert_eq!(job.id, "j-1");
        assert_eq!(job.provider_id, "");
    }

    #[test]
    fn test_tags_fall_back_to_skills() {
        let job = normalize(&raw(json!({"skills": ["x"]})));
        assert_eq!(job.tags, vec!["x"]);

        let job = normalize(&raw(json!({"tags": [], "skills": ["y"]})));
        assert_eq!(job.tags, vec!["y"]);

        let job = normalize(&raw(json!({"title": "No tags"})));
        assert!(job.tags.is_empty());
    }

    #[test]
    fn test_odd_types_are_tolerated() {
        let job = normalize(&raw(json!({
            "id": "abc",
            "title": {"en": "nested"},
            "company_name": 12,
            "category": ["a", "b"],
            "tags": ["ok", 3, {"bad": true}, null]
        })));
        assert_eq!(job.title, "");
        assert_eq!(job.company.as_deref(), Some("12"));
        assert_eq!(job.category, None);
        assert_eq!(job.tags, vec!["ok", "3"]);
    }

    #[test]
    fn test_idempotent() {
        let record = raw(json!({"id": 5, "title": "Same", "skills": ["a"]}));
        assert_eq!(normalize(&record), normalize(&record));
    }
}
