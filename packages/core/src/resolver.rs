//! Turns a (possibly mapped) URL into a parsed document.
//!
//! The resolver runs the [`UrlMapper`] first and then branches on the form
//! of the mapped URL:
//!
//! - **remote** (`http://`, `https://`): HTTP GET asking for JSON-LD. One
//!   301/302 hop is followed by resolving the `Location` target through the
//!   full resolver again, mapping included.
//! - **local** (anything else, with or without `file://`): read from disk.
//!   The document is reported under a `file://` URL so relative `@context`
//!   references resolve next to the file.
//!
//! There is no caching here; results are cached above, per operation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use reqwest::{header, redirect, Client, StatusCode};
use serde_json::{json, Value};
use tracing::info;
use url::Url;

use crate::error::ResolutionError;
use crate::loader::{DocumentLoader, RemoteDocument};
use crate::mapping::UrlMapper;

/// `Accept` header sent with every remote request.
pub const ACCEPT_JSON_LD: &str = "application/ld+json, application/json";

/// `true` for URLs the resolver fetches over HTTP(S).
pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// The production [`DocumentLoader`]: mapping, local files, and HTTP.
#[derive(Clone)]
pub struct DocumentResolver {
    mapper: Arc<UrlMapper>,
    client: Client,
}

impl DocumentResolver {
    /// Build a resolver with its own HTTP client (automatic redirects off;
    /// the resolver follows them itself).
    pub fn new(mapper: Arc<UrlMapper>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self::with_client(mapper, client))
    }

    /// Use a caller-supplied client. It should have automatic redirects
    /// disabled, otherwise redirect targets bypass the mapping table.
    pub fn with_client(mapper: Arc<UrlMapper>, client: Client) -> Self {
        Self { mapper, client }
    }

    pub fn mapper(&self) -> &Arc<UrlMapper> {
        &self.mapper
    }

    /// Resolve `url` to its document and canonical URL.
    pub async fn resolve(&self, url: &str) -> Result<RemoteDocument, ResolutionError> {
        self.resolve_inner(url.to_string(), true).await
    }

    fn resolve_inner(
        &self,
        url: String,
        follow_redirect: bool,
    ) -> BoxFuture<'_, Result<RemoteDocument, ResolutionError>> {
        Box::pin(async move {
            let mapped = self.mapper.map(&url);
            if mapped != url {
                info!("mapping: {url} -> {mapped}");
            }

            if is_remote(&mapped) {
                self.load_remote(&mapped, follow_redirect).await
            } else {
                load_local(&mapped).await
            }
        })
    }

    async fn load_remote(
        &self,
        url: &str,
        follow_redirect: bool,
    ) -> Result<RemoteDocument, ResolutionError> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT_JSON_LD)
            .send()
            .await
            .map_err(|e| ResolutionError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let is_redirect = status == StatusCode::MOVED_PERMANENTLY || status == StatusCode::FOUND;
        if is_redirect && follow_redirect {
            let target = redirect_target(url, response.headers())?;
            info!("redirect: {url} -> {target}");
            return self.resolve_inner(target, false).await;
        }
        if status != StatusCode::OK {
            return Err(ResolutionError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await.map_err(|e| ResolutionError::Network {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let mut document: Value =
            serde_json::from_str(&body).map_err(|e| ResolutionError::Parse {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        // A bare array is a context list served on its own.
        if document.is_array() {
            document = json!({ "@context": document });
        }

        info!("loaded remote: {url}");
        Ok(RemoteDocument::new(document, url))
    }
}

#[async_trait]
impl DocumentLoader for DocumentResolver {
    async fn load(&self, url: &str) -> Result<RemoteDocument, ResolutionError> {
        self.resolve(url).await
    }
}

/// Absolute target of a redirect, with relative `Location`s joined onto the
/// request URL.
fn redirect_target(url: &str, headers: &header::HeaderMap) -> Result<String, ResolutionError> {
    let location = headers
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ResolutionError::Redirect {
            url: url.to_string(),
            message: "missing Location header".into(),
        })?;
    Url::parse(url)
        .and_then(|base| base.join(location))
        .map(String::from)
        .map_err(|e| ResolutionError::Redirect {
            url: url.to_string(),
            message: e.to_string(),
        })
}

async fn load_local(url: &str) -> Result<RemoteDocument, ResolutionError> {
    let io_error = |message: String| ResolutionError::Io {
        url: url.to_string(),
        message,
    };

    let path = local_path(url).map_err(io_error)?;
    let absolute = std::path::absolute(&path).map_err(|e| io_error(e.to_string()))?;
    let content = tokio::fs::read_to_string(&absolute)
        .await
        .map_err(|e| io_error(e.to_string()))?;
    let document: Value = serde_json::from_str(&content).map_err(|e| ResolutionError::Parse {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    let document_url = Url::from_file_path(&absolute)
        .map_err(|()| io_error(format!("{} has no file URL form", absolute.display())))?;

    info!("loaded local: {}", absolute.display());
    Ok(RemoteDocument::new(document, document_url))
}

/// The filesystem path a local reference names. `file:` URLs are
/// percent-decoded; anything else is taken as a plain path.
fn local_path(url: &str) -> Result<PathBuf, String> {
    if !url.starts_with("file:") {
        return Ok(PathBuf::from(url));
    }
    Url::parse(url)
        .map_err(|e| e.to_string())?
        .to_file_path()
        .map_err(|()| format!("{url} does not name a local path"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
