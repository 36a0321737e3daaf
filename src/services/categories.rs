// src/services/categories.rs

//! Category taxonomy listing.

use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::models::{CategoryEntry, RawRecord};
use crate::services::upstream::{JsonSource, QueryParams};
use crate::utils::fields::{first_present, to_text};

/// Path of the categories endpoint, relative to the upstream base URL.
pub const CATEGORIES_PATH: &str = "/remote-jobs/categories";

/// Payload keys that may hold the category list, in priority order.
pub const CATEGORY_LIST_KEYS: [&str; 3] = ["jobs", "categories", "data"];

/// Entry keys that may hold the display label, in priority order.
pub const LABEL_KEYS: [&str; 3] = ["name", "category", "slug"];

/// Entry keys that may hold the filter value, in priority order.
pub const VALUE_KEYS: [&str; 2] = ["slug", "name"];

/// Lists upstream categories as sorted value/label pairs.
#[derive(Clone)]
pub struct CategoryLister {
    source: Arc<dyn JsonSource>,
}

impl CategoryLister {
    pub fn new(source: Arc<dyn JsonSource>) -> Self {
        Self { source }
    }

    /// Fetch the category taxonomy from the configured base URL.
    pub async fn list_categories(&self) -> Result<Vec<CategoryEntry>> {
        let payload = self.source.fetch(CATEGORIES_PATH, &QueryParams::new()).await?;
        Ok(extract_categories(&payload))
    }
}

/// Turn a categories payload into entries sorted case-insensitively by label.
/// Entries without any usable label are dropped.
pub fn extract_categories(payload: &RawRecord) -> Vec<CategoryEntry> {
    let raw: &[Value] = match first_present(payload, &CATEGORY_LIST_KEYS) {
        Some(Value::Array(items)) => items,
        _ => &[],
    };

    let mut entries: Vec<CategoryEntry> = raw
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let label = first_present(entry, &LABEL_KEYS)?;
            let value = first_present(entry, &VALUE_KEYS).unwrap_or(label);
            Some(CategoryEntry {
                value: to_text(value).trim().to_string(),
                label: to_text(label).trim().to_string(),
            })
        })
        .collect();

    entries.sort_by_cached_key(|entry| entry.label.to_lowercase());
    entries
}
