//! Category taxonomy entry.

use serde::{Deserialize, Serialize};

/// A job category as offered to clients for filtering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Slug-like value to pass back as the `category` filter
    pub value: String,

    /// Display label
    pub label: String,
}
