// src/server/jobs.rs

//! Job listing, lookup and category routes.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CategoryEntry, NormalizedJob, PageResult};
use crate::pipeline::PER_PAGE_RANGE;
use crate::server::AppState;
use crate::storage::mark_favorites;

const DEFAULT_PER_PAGE: i64 = 20;

/// Query string of `GET /api/jobs`.
#[derive(Debug, Deserialize)]
pub struct JobsQuery {
    /// Free-text search
    pub q: Option<String>,

    /// Category slug or name
    pub category: Option<String>,

    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl JobsQuery {
    fn validated(&self) -> Result<(i64, u32)> {
        let page = self.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        let per_page = self.per_page.unwrap_or(DEFAULT_PER_PAGE);
        match u32::try_from(per_page) {
            Ok(per_page) if PER_PAGE_RANGE.contains(&per_page) => Ok((page, per_page)),
            _ => Err(AppError::validation(format!(
                "per_page must be between {} and {}, got {}",
                PER_PAGE_RANGE.start(),
                PER_PAGE_RANGE.end(),
                per_page
            ))),
        }
    }
}

pub async fn list_jobs_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<JobsQuery>, QueryRejection>,
) -> Result<Json<PageResult>> {
    let Query(params) = query.map_err(|e| AppError::validation(e.body_text()))?;
    let (page, per_page) = params.validated()?;
    let mut result = state
        .gateway
        .list_jobs(
            params.q.as_deref(),
            params.category.as_deref(),
            page,
            per_page,
        )
        .await?;

    layer_favorites(&state, result.items.iter_mut()).await;
    Ok(Json(result))
}

pub async fn get_job_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<NormalizedJob>> {
    let mut job = state.gateway.find_job(&id).await?;
    layer_favorites(&state, std::iter::once(&mut job)).await;
    Ok(Json(job))
}

pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryEntry>>> {
    Ok(Json(state.gateway.list_categories().await?))
}

/// Flag favorited jobs. A failing store leaves every flag false rather than
/// failing the listing.
async fn layer_favorites<'a>(
    state: &AppState,
    jobs: impl IntoIterator<Item = &'a mut NormalizedJob>,
) {
    match state.favorites.ids().await {
        Ok(ids) => mark_favorites(jobs, &ids),
        Err(e) => tracing::warn!("Could not read favorites, flags left unset: {}", e),
    }
}
