//! Expansion and compaction handlers.
//!
//! - `POST /expand`  — recursively expand a document.
//! - `POST /compact` — recursively expand, then compact against the
//!   document's own context.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ldr::Computed;
use ldr_api::{DocumentRequest, ResultResponse};

use crate::error::AppError;

use super::AppState;

/// `POST /expand`
///
/// Returns 400 if the body is not JSON or has no `url`, 502 if the requested
/// document itself cannot be loaded. Nested failures are reported inline.
pub async fn expand(
    State(state): State<AppState>,
    body: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<ResultResponse>, AppError> {
    let (url, depth) = target(&state, body)?;
    let computed = state.service.expand(&url, depth).await?;
    Ok(Json(response(computed)))
}

/// `POST /compact`
pub async fn compact(
    State(state): State<AppState>,
    body: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<ResultResponse>, AppError> {
    let (url, depth) = target(&state, body)?;
    let computed = state.service.compact(&url, depth).await?;
    Ok(Json(response(computed)))
}

/// The requested URL and the effective depth.
fn target(
    state: &AppState,
    body: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<(String, u32), AppError> {
    let Json(req) = body?;
    let url = req
        .url
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::BadRequest("Missing url".into()))?;
    Ok((url, req.depth.unwrap_or(state.config.default_depth)))
}

fn response(computed: Computed) -> ResultResponse {
    ResultResponse {
        result: computed.result,
        cached: computed.cached,
    }
}
