//! jobgate HTTP server
//!
//! Serves the job listing API. Configuration is read from the TOML file named
//! by `JOBGATE_CONFIG` (default `config.toml`), then environment overrides.

use std::sync::Arc;

use jobgate::{
    error::Result,
    models::Config,
    pipeline::Gateway,
    server::{AppState, build_app},
    storage::LocalStorage,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{level},tower_http=debug").into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let config_path =
        std::env::var("JOBGATE_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let (mut config, load_error) = match Config::load(&config_path) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    config.apply_env();

    // Tracing needs the configured level, so load problems are reported late.
    init_tracing(&config.logging.level);
    match load_error {
        None => info!("Loaded configuration from {}", config_path),
        Some(e) => warn!(
            "Config load failed from {}: {}. Using defaults.",
            config_path, e
        ),
    }
    config.validate()?;

    let gateway = Gateway::from_config(&config.upstream)?;
    info!("Upstream job endpoints: {:?}", gateway.endpoints());
    let favorites = Arc::new(LocalStorage::new(&config.storage.dir));
    let app = build_app(AppState::new(gateway, favorites), &config);

    let addr = config.server.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);
    info!("Health check: http://{}/healthz", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
