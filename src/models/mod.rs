// src/models/mod.rs

//! Domain models for the gateway.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod category;
mod config;
mod job;

use serde_json::{Map, Value};

// Re-export all public types
pub use category::CategoryEntry;
pub use config::{Config, LoggingConfig, ServerConfig, StorageConfig, UpstreamConfig};
pub use job::{JobBatch, NormalizedJob, PageResult};

/// An untyped upstream JSON object. Field names and presence vary.
pub type RawRecord = Map<String, Value>;
