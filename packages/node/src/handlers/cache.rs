//! Cache inspection handlers.
//!
//! - `GET    /cache/stats` — entry count and keys.
//! - `GET    /cache/list`  — the same keys under `urls`.
//! - `DELETE /cache`       — drop every entry.

use axum::{extract::State, Json};
use ldr::ResultCache;
use ldr_api::{CacheListResponse, CacheStatsResponse, ClearedResponse};
use tracing::info;

use crate::error::AppError;

use super::AppState;

async fn rendered_keys(state: &AppState) -> Result<Vec<String>, AppError> {
    let keys = state.service.cache().keys().await?;
    Ok(keys.iter().map(ToString::to_string).collect())
}

/// `GET /cache/stats`
pub async fn stats(State(state): State<AppState>) -> Result<Json<CacheStatsResponse>, AppError> {
    let keys = rendered_keys(&state).await?;
    Ok(Json(CacheStatsResponse {
        size: keys.len(),
        keys,
    }))
}

/// `GET /cache/list`
pub async fn list(State(state): State<AppState>) -> Result<Json<CacheListResponse>, AppError> {
    let urls = rendered_keys(&state).await?;
    Ok(Json(CacheListResponse {
        count: urls.len(),
        urls,
    }))
}

/// `DELETE /cache`
pub async fn clear(State(state): State<AppState>) -> Result<Json<ClearedResponse>, AppError> {
    let cleared = state.service.cache().clear().await?;
    info!("cache cleared ({cleared} entries)");
    Ok(Json(ClearedResponse { cleared }))
}
