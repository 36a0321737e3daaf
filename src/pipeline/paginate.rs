// src/pipeline/paginate.rs

//! Local pagination over an upstream that only supports `limit`.
//!
//! The upstream has no offset parameter, so each page request over-fetches
//! every record up to the end of the requested page and slices locally. The
//! fetch is capped at [`MAX_LIMIT`]; pages starting at or beyond the cap come
//! back empty. That is an upstream limitation and is kept as is.

use crate::error::{AppError, Result};
use crate::models::{NormalizedJob, PageResult};
use crate::services::JobAggregator;

/// Largest `limit` ever requested from upstream.
pub const MAX_LIMIT: u32 = 200;

/// Accepted page sizes.
pub const PER_PAGE_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Upstream `limit` needed to cover pages `1..=page` of size `per_page`.
pub fn fetch_limit(page: u32, per_page: u32) -> u32 {
    per_page.saturating_mul(page).max(per_page).min(MAX_LIMIT)
}

/// Slice page `page` (1-based) out of `items`. Out-of-range pages are empty.
pub fn slice_page<T: Clone>(items: &[T], page: u32, per_page: u32) -> Vec<T> {
    let start = (page.max(1) as usize - 1).saturating_mul(per_page as usize);
    items
        .iter()
        .skip(start)
        .take(per_page as usize)
        .cloned()
        .collect()
}

/// Number of pages for `total` items, never less than one. A negative
/// upstream total yields a single page.
pub fn total_pages(total: i64, per_page: u32) -> u64 {
    let per_page = i64::from(per_page.max(1));
    let pages = total.saturating_add(per_page - 1).div_euclid(per_page);
    u64::try_from(pages).unwrap_or(0).max(1)
}

/// Pages and looks up jobs on top of a [`JobAggregator`].
#[derive(Clone)]
pub struct JobPaginator {
    aggregator: JobAggregator,
}

impl JobPaginator {
    pub fn new(aggregator: JobAggregator) -> Self {
        Self { aggregator }
    }

    /// Fetch and slice one page of jobs.
    ///
    /// `page` below 1 is treated as 1; `per_page` must be within
    /// [`PER_PAGE_RANGE`].
    pub async fn page(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        page: i64,
        per_page: u32,
    ) -> Result<PageResult> {
        if !PER_PAGE_RANGE.contains(&per_page) {
            return Err(AppError::validation(format!(
                "per_page must be between {} and {}, got {}",
                PER_PAGE_RANGE.start(),
                PER_PAGE_RANGE.end(),
                per_page
            )));
        }
        let page = u32::try_from(page.max(1)).unwrap_or(u32::MAX);
        let limit = fetch_limit(page, per_page);
        log::debug!(
            "Fetching page {} (per_page {}) with upstream limit {}",
            page,
            per_page,
            limit
        );

        let batch = self.aggregator.list_jobs(query, category, Some(limit)).await?;
        Ok(PageResult {
            items: slice_page(&batch.items, page, per_page),
            total: batch.total,
            page,
            per_page,
            total_pages: total_pages(batch.total, per_page),
        })
    }

    /// Find a single job by canonical or provider id.
    ///
    /// Upstream has no by-id endpoint: scan a [`MAX_LIMIT`] batch first,
    /// then a batch at the upstream default limit.
    pub async fn find(&self, id: &str) -> Result<NormalizedJob> {
        for limit in [Some(MAX_LIMIT), None] {
            let batch = self.aggregator.list_jobs(None, None, limit).await?;
            if let Some(job) = batch.items.into_iter().find(|job| job.matches_id(id)) {
                return Ok(job);
            }
        }
        Err(AppError::not_found(format!("job not found: {id}")))
    }
}
