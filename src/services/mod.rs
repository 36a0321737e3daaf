//! Service layer for the gateway.
//!
//! This module contains the business logic for:
//! - Upstream access (`UpstreamClient`, behind the `JsonSource` trait)
//! - Record normalization (`normalize`)
//! - Mirror fallback and payload extraction (`JobAggregator`)
//! - Category listing (`CategoryLister`)

pub mod aggregator;
pub mod categories;
pub mod normalizer;
pub mod upstream;

pub use aggregator::JobAggregator;
pub use categories::CategoryLister;
pub use normalizer::normalize;
pub use upstream::{JsonSource, QueryParams, UpstreamClient};
