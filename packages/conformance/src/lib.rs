//! Shared helpers for the ldr conformance test suite.
//!
//! Provides [`spawn_server`], which binds a `TcpListener` on an ephemeral
//! port and runs an in-process resolver with the production
//! [`DocumentResolver`](ldr::DocumentResolver), and [`spawn_documents`],
//! which serves fixture JSON-LD documents for it to fetch.

use std::sync::Arc;

use axum::Router;
use ldr::{LdrService, MemoryCache, UrlMapper};
use ldr_server::{build_router, ServerConfig};

/// Start an ephemeral in-process resolver and return `(base_url, service)`.
///
/// The server runs in a background `tokio` task bound to an OS-assigned port
/// on `127.0.0.1`. The returned [`LdrService`] is the instance behind the
/// router, so tests can inspect its cache and mapper directly.
///
/// # Panics
///
/// Panics if the TCP listener cannot be bound or the server fails to start.
pub async fn spawn_server() -> (String, LdrService) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");
    let base_url = format!("http://{addr}");

    let service = LdrService::with_resolver(
        Arc::new(UrlMapper::default()),
        Arc::new(MemoryCache::new()),
    )
    .expect("build resolver HTTP client");
    let config = ServerConfig {
        bind_addr: addr,
        ..ServerConfig::default()
    };
    let router = build_router(service.clone(), config);

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("conformance server error");
    });

    (base_url, service)
}

/// Serve `router` on an ephemeral port and return its base URL. Used to host
/// the remote documents the resolver fetches.
pub async fn spawn_documents(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("get local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("document server error");
    });

    format!("http://{addr}")
}
