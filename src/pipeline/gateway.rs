// src/pipeline/gateway.rs

//! Wiring of the upstream client, aggregator, paginator and category lister.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{CategoryEntry, NormalizedJob, PageResult, UpstreamConfig};
use crate::pipeline::paginate::JobPaginator;
use crate::services::{CategoryLister, JobAggregator, JsonSource, UpstreamClient};

/// The job listing core, ready to serve requests.
///
/// Holds no per-request state; every call goes to upstream.
#[derive(Clone)]
pub struct Gateway {
    paginator: JobPaginator,
    categories: CategoryLister,
    endpoints: Vec<String>,
}

impl Gateway {
    /// Build the core over a real HTTP client.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self> {
        let client = UpstreamClient::new(config)?;
        Ok(Self::with_source(Arc::new(client), config.job_endpoints()))
    }

    /// Build the core over any JSON source.
    pub fn with_source(source: Arc<dyn JsonSource>, endpoints: Vec<String>) -> Self {
        let aggregator = JobAggregator::new(Arc::clone(&source), endpoints.clone());
        Self {
            paginator: JobPaginator::new(aggregator),
            categories: CategoryLister::new(source),
            endpoints,
        }
    }

    /// Job-listing endpoints in fallback order.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    pub async fn list_jobs(
        &self,
        query: Option<&str>,
        category: Option<&str>,
        page: i64,
        per_page: u32,
    ) -> Result<PageResult> {
        self.paginator.page(query, category, page, per_page).await
    }

    pub async fn find_job(&self, id: &str) -> Result<NormalizedJob> {
        self.paginator.find(id).await
    }

    pub async fn list_categories(&self) -> Result<Vec<CategoryEntry>> {
        self.categories.list_categories().await
    }
}
