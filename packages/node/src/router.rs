//! Assembles the Axum [`Router`] from all handler modules.

use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::{delete, get, post},
    Router,
};
use ldr::LdrService;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    config::ServerConfig,
    error::AppError,
    handlers::{cache, documents, health, mappings, AppState},
};

/// Build the complete application router with shared state.
pub fn build_router(service: LdrService, config: ServerConfig) -> Router {
    let state = AppState { service, config };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health::health))
        // Mapping table
        .route(
            "/mappings",
            get(mappings::get_mappings)
                .post(mappings::set_mappings)
                .delete(mappings::clear_mappings),
        )
        // Result cache
        .route("/cache/stats", get(cache::stats))
        .route("/cache/list", get(cache::list))
        .route("/cache", delete(cache::clear))
        // Documents
        .route("/expand", post(documents::expand))
        .route("/compact", post(documents::compact))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn not_found() -> AppError {
    AppError::NotFound("Not found".into())
}
