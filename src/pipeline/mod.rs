//! Request pipeline for job listing.
//!
//! - `paginate`: over-fetch and slice pages, by-id lookup
//! - `gateway`: wires the services into one cloneable handle

pub mod gateway;
pub mod paginate;

pub use gateway::Gateway;
pub use paginate::{JobPaginator, MAX_LIMIT, PER_PAGE_RANGE};
