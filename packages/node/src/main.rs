//! `ldr-server` — recursive JSON-LD expansion and compaction over HTTP.
//!
//! # Quick start
//!
//! ```sh
//! # Default port 3000, empty mapping table:
//! ldr-server
//!
//! # Custom port and a mapping file:
//! PORT=8080 MAPPINGS_FILE=./mappings.json ldr-server
//! ```
//!
//! # Environment variables
//!
//! See [`ServerConfig`] for the full list.

use std::sync::Arc;

use ldr::{LdrService, MemoryCache, ResultCache, UrlMapper};
use ldr_server::{build_router, startup, ServerConfig};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ldr_server=info,ldr=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| panic!("invalid configuration: {e}"));

    let mapper = Arc::new(UrlMapper::default().with_max_depth(config.max_mapping_depth));
    if let Some(path) = &config.mappings_file {
        // Not fatal: the server starts with an empty table.
        if let Err(e) = startup::load_startup_mappings(&mapper, path) {
            tracing::warn!("failed to load mappings from {}: {e}", path.display());
        }
    }

    let cache: Arc<dyn ResultCache> = Arc::new(MemoryCache::new());
    let service = LdrService::with_resolver(Arc::clone(&mapper), Arc::clone(&cache))
        .unwrap_or_else(|e| panic!("failed to build HTTP client: {e}"));

    let app = build_router(service, config.clone());

    tracing::info!("listening on {}", config.bind_addr);
    tracing::info!(
        "default depth {}, max mapping depth {}, {} mappings",
        config.default_depth,
        config.max_mapping_depth,
        mapper.len()
    );
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal(cache))
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
