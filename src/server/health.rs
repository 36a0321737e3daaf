// src/server/health.rs

//! Liveness and landing routes.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct RootResponse {
    name: &'static str,
    health: &'static str,
}

/// Liveness probe. Does not touch upstream.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        name: env!("CARGO_PKG_NAME"),
        health: "/healthz",
    })
}
