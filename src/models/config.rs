//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Origins that are always allowed, whatever else is configured.
const LOCAL_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Upstream job board settings
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// HTTP surface settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Favorites storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from process environment variables.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("APP_PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => log::warn!("Ignoring invalid APP_PORT value {:?}", port),
            }
        }
        if let Some(base) = lookup("UPSTREAM_BASE_URL") {
            self.upstream.base_url = base.trim().to_string();
        }
        if let Some(mirrors) = lookup("UPSTREAM_MIRRORS") {
            self.upstream.mirrors = split_list(&mirrors);
        }
        if let Some(frontend) = lookup("FRONTEND_URL") {
            let frontend = frontend.trim();
            self.server.frontend_url = (!frontend.is_empty()).then(|| frontend.to_string());
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.server.cors_origins = split_list(&origins);
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level.trim().to_lowercase();
        }
        if let Some(dir) = lookup("STORAGE_DIR") {
            self.storage.dir = dir.trim().to_string();
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.user_agent.trim().is_empty() {
            return Err(AppError::validation("upstream.user_agent is empty"));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(AppError::validation("upstream.timeout_secs must be > 0"));
        }
        check_http_url("upstream.base_url", &self.upstream.base_url)?;
        for mirror in &self.upstream.mirrors {
            check_http_url("upstream.mirrors", mirror)?;
        }
        if self.server.port == 0 {
            return Err(AppError::validation("server.port must be > 0"));
        }
        Ok(())
    }

    /// Allowed CORS origins: the frontend URL, configured extras, then the
    /// local development origins. Trailing slashes are stripped, duplicates
    /// dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();
        let configured = self
            .server
            .frontend_url
            .iter()
            .chain(self.server.cors_origins.iter())
            .map(|o| o.trim().trim_end_matches('/'))
            .filter(|o| !o.is_empty())
            .map(str::to_string);
        let defaults = LOCAL_ORIGINS.iter().map(|o| o.to_string());

        for origin in configured.chain(defaults) {
            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }
        origins
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn check_http_url(field: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| AppError::validation(format!("{field}: invalid URL {value:?}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(AppError::validation(format!(
            "{field}: unsupported scheme in {value:?}"
        )));
    }
    Ok(())
}

/// Upstream job board and HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL that relative paths are resolved against
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Full job-listing URLs, tried in order
    #[serde(default = "defaults::mirrors")]
    pub mirrors: Vec<String>,

    /// User-Agent header sent on every upstream call
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    /// Job-listing endpoints in priority order. Without explicit mirrors the
    /// listing path under `base_url` is the only candidate.
    pub fn job_endpoints(&self) -> Vec<String> {
        if self.mirrors.is_empty() {
            vec![format!(
                "{}/{}",
                self.base_url.trim_end_matches('/'),
                defaults::JOBS_PATH
            )]
        } else {
            self.mirrors.clone()
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            mirrors: defaults::mirrors(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// HTTP surface settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "defaults::host")]
    pub host: String,

    #[serde(default = "defaults::port")]
    pub port: u16,

    /// Public URL of the frontend, allowed for CORS
    #[serde(default)]
    pub frontend_url: Option<String>,

    /// Extra allowed CORS origins
    #[serde(default = "defaults::cors_origins")]
    pub cors_origins: Vec<String>,

    /// Responses smaller than this are sent uncompressed
    #[serde(default = "defaults::compression_min_bytes")]
    pub compression_min_bytes: u16,
}

impl ServerConfig {
    /// Socket address string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::host(),
            port: defaults::port(),
            frontend_url: None,
            cors_origins: defaults::cors_origins(),
            compression_min_bytes: defaults::compression_min_bytes(),
        }
    }
}

/// Favorites storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `favorites.json`
    #[serde(default = "defaults::storage_dir")]
    pub dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: defaults::storage_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

mod defaults {
    pub const JOBS_PATH: &str = "remote-jobs";

    // Upstream defaults
    pub fn base_url() -> String {
        "https://remotive.com/api".into()
    }
    pub fn mirrors() -> Vec<String> {
        vec![
            "https://remotive.com/api/remote-jobs".into(),
            "https://remotive.io/api/remote-jobs".into(),
        ]
    }
    pub fn user_agent() -> String {
        "jobgate/1.0".into()
    }
    pub fn timeout() -> u64 {
        20
    }

    // Server defaults
    pub fn host() -> String {
        "0.0.0.0".into()
    }
    pub fn port() -> u16 {
        8080
    }
    pub fn cors_origins() -> Vec<String> {
        vec!["http://localhost:3000".into()]
    }
    pub fn compression_min_bytes() -> u16 {
        1024
    }

    pub fn storage_dir() -> String {
        "storage".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }
}
