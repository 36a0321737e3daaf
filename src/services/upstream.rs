// src/services/upstream.rs

//! Upstream job board client.
//!
//! Issues single JSON GET requests. There is no retry here; falling back
//! across mirrors is the aggregator's job.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{RawRecord, UpstreamConfig};
use crate::utils::http::{create_async_client, join_path};

/// Ordered query parameters for an upstream call.
pub type QueryParams = Vec<(&'static str, String)>;

/// A source of JSON objects addressed by path or URL.
#[async_trait]
pub trait JsonSource: Send + Sync {
    /// GET `target` with `params` and return the body as a JSON object.
    ///
    /// `target` is either an absolute URL or a path relative to the
    /// source's base URL.
    async fn fetch(&self, target: &str, params: &QueryParams) -> Result<RawRecord>;

    /// Like [`fetch`](Self::fetch), but only `200 OK` counts as success.
    /// Used when walking the mirror list.
    async fn fetch_mirror(&self, target: &str, params: &QueryParams) -> Result<RawRecord> {
        self.fetch(target, params).await
    }
}

/// Which response statuses count as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusPolicy {
    AnySuccess,
    OkOnly,
}

impl StatusPolicy {
    fn accepts(self, status: StatusCode) -> bool {
        match self {
            Self::AnySuccess => status.is_success(),
            Self::OkOnly => status == StatusCode::OK,
        }
    }
}

/// HTTP client bound to the configured upstream base URL.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
    base_url: String,
}

impl UpstreamClient {
    /// Create a client with the configured user agent and timeout.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        Ok(Self::with_client(
            create_async_client(config)?,
            &config.base_url,
        ))
    }

    /// Wrap an existing `reqwest` client.
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// Resolve a target into a full URL string.
    fn resolve(&self, target: &str) -> String {
        match Url::parse(target) {
            Ok(url) => url.to_string(),
            Err(_) => join_path(&self.base_url, target),
        }
    }

    async fn get_object(
        &self,
        target: &str,
        params: &QueryParams,
        policy: StatusPolicy,
    ) -> Result<RawRecord> {
        let url = self.resolve(target);
        log::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !policy.accepts(status) {
            return Err(AppError::upstream(&url, format!("status {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(&url, e))?;
        let value: Value = serde_json::from_slice(&body)
            .map_err(|e| AppError::upstream(&url, format!("invalid JSON body: {e}")))?;

        into_object(&url, value)
    }
}

#[async_trait]
impl JsonSource for UpstreamClient {
    async fn fetch(&self, target: &str, params: &QueryParams) -> Result<RawRecord> {
        self.get_object(target, params, StatusPolicy::AnySuccess).await
    }

    async fn fetch_mirror(&self, target: &str, params: &QueryParams) -> Result<RawRecord> {
        self.get_object(target, params, StatusPolicy::OkOnly).await
    }
}

fn transport_error(url: &str, error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::upstream(url, format!("request timed out: {error}"))
    } else {
        AppError::upstream(url, error)
    }
}

/// Accept only JSON objects; anything else is a shape mismatch.
fn into_object(url: &str, value: Value) -> Result<RawRecord> {
    let found = match value {
        Value::Object(map) => return Ok(map),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
    };
    Err(AppError::UpstreamShape {
        url: url.to_string(),
        found,
    })
}
