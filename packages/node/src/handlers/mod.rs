//! HTTP request handlers for all resolver endpoints.
//!
//! Each submodule covers a logical group of endpoints. Handlers are async
//! functions that receive Axum extractors and return
//! `Result<Json<_>, AppError>`. JSON bodies are taken as
//! `Result<Json<T>, JsonRejection>` so malformed input gets the standard
//! error body.

pub mod cache;
pub mod documents;
pub mod health;
pub mod mappings;

use ldr::LdrService;

use crate::config::ServerConfig;

/// Shared application state threaded through all Axum handlers via [`axum::extract::State`].
#[derive(Clone)]
pub struct AppState {
    pub service: LdrService,
    pub config: ServerConfig,
}
