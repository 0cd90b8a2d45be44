//! Mapping table handlers.
//!
//! - `GET    /mappings` — the table in effect.
//! - `POST   /mappings` — replace the table, from a server-side file or inline.
//! - `DELETE /mappings` — empty the table.
//!
//! Replacing the table does not invalidate cached results.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use ldr::MappingTable;
use ldr_api::{ClearedResponse, MappingsResponse, SetMappingsRequest, SetMappingsResponse};
use tracing::info;

use crate::error::AppError;

use super::AppState;

/// `GET /mappings`
pub async fn get_mappings(State(state): State<AppState>) -> Json<MappingsResponse> {
    Json(MappingsResponse {
        mappings: state.service.mapper().table(),
    })
}

/// `POST /mappings`
///
/// `{"file": path}` loads a mapping file from the server's filesystem;
/// `{"mappings": {...}}` installs the given table. Returns 400 when neither
/// is present or the file cannot be read or parsed.
pub async fn set_mappings(
    State(state): State<AppState>,
    body: Result<Json<SetMappingsRequest>, JsonRejection>,
) -> Result<Json<SetMappingsResponse>, AppError> {
    let Json(req) = body?;

    let (table, message) = match (req.file, req.mappings) {
        (Some(file), _) => {
            let table = MappingTable::from_file(&file)?;
            info!("mappings loaded from {file}");
            (table, "Mappings loaded from file")
        }
        (None, Some(table)) => (table, "Mappings set"),
        (None, None) => return Err(AppError::BadRequest("Missing file or mappings".into())),
    };

    let count = state.service.mapper().replace(table);
    info!("mapping table replaced ({count} rules)");

    Ok(Json(SetMappingsResponse {
        message: message.into(),
        count,
        mappings: state.service.mapper().table(),
    }))
}

/// `DELETE /mappings`
pub async fn clear_mappings(State(state): State<AppState>) -> Json<ClearedResponse> {
    let cleared = state.service.mapper().clear();
    info!("mapping table cleared ({cleared} rules)");
    Json(ClearedResponse { cleared })
}
