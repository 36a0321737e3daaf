// src/server/favorites.rs

//! Favorites routes for the single demo user.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::NormalizedJob;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct FavoriteIn {
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteAdded {
    pub message: &'static str,
    pub job_id: String,
}

#[derive(Debug, Serialize)]
pub struct FavoriteCheck {
    pub is_favorite: bool,
    pub job_id: String,
}

/// Favorites, newest first.
pub async fn list_favorites_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<NormalizedJob>>> {
    let jobs = state
        .favorites
        .list()
        .await?
        .into_iter()
        .map(|record| NormalizedJob {
            is_favorite: true,
            ..record.job
        })
        .collect();
    Ok(Json(jobs))
}

/// Add a favorite. The job must exist upstream unless it is already stored.
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    Json(payload): Json<FavoriteIn>,
) -> Result<(StatusCode, Json<FavoriteAdded>)> {
    if !state.favorites.contains(&payload.job_id).await? {
        let job = state.gateway.find_job(&payload.job_id).await?;
        // Store under the canonical id even when looked up by provider id.
        let stored_id = job.id.clone();
        state.favorites.add(job).await?;
        if stored_id != payload.job_id {
            tracing::debug!("Favorite {} stored as {}", payload.job_id, stored_id);
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(FavoriteAdded {
            message: "added to favorites",
            job_id: payload.job_id,
        }),
    ))
}

pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<StatusCode> {
    if state.favorites.remove(&job_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found(format!("favorite not found: {job_id}")))
    }
}

pub async fn check_favorite_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<FavoriteCheck>> {
    let is_favorite = state.favorites.contains(&job_id).await?;
    Ok(Json(FavoriteCheck {
        is_favorite,
        job_id,
    }))
}
