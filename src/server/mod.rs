// src/server/mod.rs

//! HTTP surface for the gateway.
//!
//! Thin `axum` layer over [`Gateway`] plus the favorites store. Upstream
//! calls run inside the request future, so a client that disconnects drops
//! the in-flight upstream call with it.

mod error;
mod favorites;
mod health;
mod jobs;

use std::sync::Arc;

use axum::Router;
use axum::http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{delete, get};
use tower_http::compression::predicate::{NotForContentType, Predicate, SizeAbove};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::models::Config;
use crate::pipeline::Gateway;
use crate::storage::FavoriteStore;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Gateway,
    pub favorites: Arc<dyn FavoriteStore>,
}

impl AppState {
    pub fn new(gateway: Gateway, favorites: Arc<dyn FavoriteStore>) -> Self {
        Self { gateway, favorites }
    }
}

/// Build the router with CORS, compression and request tracing.
pub fn build_app(state: AppState, config: &Config) -> Router {
    let origins: Vec<HeaderValue> = config
        .cors_origins()
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE]);

    let compress_when = SizeAbove::new(config.server.compression_min_bytes)
        .and(NotForContentType::GRPC)
        .and(NotForContentType::IMAGES)
        .and(NotForContentType::SSE);
    let compression = CompressionLayer::new().compress_when(compress_when);

    Router::new()
        .route("/", get(health::root_handler))
        .route("/healthz", get(health::health_handler))
        .route("/api/jobs", get(jobs::list_jobs_handler))
        .route("/api/jobs/:id", get(jobs::get_job_handler))
        .route("/api/categories", get(jobs::list_categories_handler))
        .route(
            "/api/favorites",
            get(favorites::list_favorites_handler).post(favorites::add_favorite_handler),
        )
        .route("/api/favorites/:job_id", delete(favorites::remove_favorite_handler))
        .route(
            "/api/favorites/check/:job_id",
            get(favorites::check_favorite_handler),
        )
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(compression)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
