// src/error.rs

//! Unified error handling for the gateway.

use std::fmt;

use thiserror::Error;

/// Result type alias for gateway operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or a request could not be prepared
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A single upstream call failed (transport, status or body)
    #[error("upstream request to {url} failed: {message}")]
    Upstream { url: String, message: String },

    /// Upstream answered with valid JSON that is not an object
    #[error("upstream response from {url} is not a JSON object (got {found})")]
    UpstreamShape { url: String, found: &'static str },

    /// Every configured mirror failed
    #[error("all {attempts} upstream mirror(s) failed; last error: {last}")]
    UpstreamUnavailable { attempts: usize, last: Box<AppError> },

    /// Lookup exhausted without a match
    #[error("{0}")]
    NotFound(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an upstream error for the given URL.
    pub fn upstream(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Upstream {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Whether this error came from the upstream boundary and should be
    /// reported to callers as a bad gateway.
    pub fn is_gateway(&self) -> bool {
        matches!(
            self,
            Self::Upstream { .. } | Self::UpstreamShape { .. } | Self::UpstreamUnavailable { .. }
        )
    }
}
