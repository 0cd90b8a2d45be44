//! Liveness handler: `GET /health`.

use axum::{extract::State, Json};
use ldr::ResultCache;
use ldr_api::HealthResponse;

use crate::error::AppError;

use super::AppState;

/// `GET /health`
///
/// Always `"ok"` while the process serves requests, with the current cache
/// and mapping table sizes.
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    Ok(Json(HealthResponse {
        status: "ok".into(),
        cache_size: state.service.cache().len().await?,
        mappings_count: state.service.mapper().len(),
    }))
}
