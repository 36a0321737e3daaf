// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::UpstreamConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &UpstreamConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Join a relative path onto a base URL with exactly one slash between them.
pub fn join_path(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path() {
        assert_eq!(
            join_path("https://example.com/api", "/remote-jobs"),
            "https://example.com/api/remote-jobs"
        );
        assert_eq!(
            join_path("https://example.com/api/", "remote-jobs/categories"),
            "https://example.com/api/remote-jobs/categories"
        );
    }

    #[test]
    fn test_create_client_from_defaults() {
        assert!(create_async_client(&UpstreamConfig::default()).is_ok());
    }
}
