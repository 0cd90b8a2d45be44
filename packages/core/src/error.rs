//! Error types shared across the resolution pipeline.

use std::path::PathBuf;

/// A document could not be obtained for a URL.
///
/// Every variant carries the offending URL so that an inline `_error`
/// marker or an HTTP error body can name what failed.
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    /// Reading a local file failed.
    #[error("could not load local file {url}: {message}")]
    Io { url: String, message: String },

    /// The bytes were fetched but are not valid JSON.
    #[error("failed to parse JSON from {url}: {message}")]
    Parse { url: String, message: String },

    /// The remote server answered with a status other than 200 (or an
    /// unfollowed redirect).
    #[error("HTTP {status}: {reason} ({url})")]
    Status {
        url: String,
        status: u16,
        reason: String,
    },

    /// The HTTP request itself failed (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// A 301/302 response without a usable `Location` header.
    #[error("invalid redirect from {url}: {message}")]
    Redirect { url: String, message: String },

    /// An in-memory loader has nothing registered under this URL.
    #[error("no document registered for {url}")]
    Missing { url: String },
}

impl ResolutionError {
    /// The URL the failure refers to.
    pub fn url(&self) -> &str {
        match self {
            ResolutionError::Io { url, .. }
            | ResolutionError::Parse { url, .. }
            | ResolutionError::Status { url, .. }
            | ResolutionError::Network { url, .. }
            | ResolutionError::Redirect { url, .. }
            | ResolutionError::Missing { url } => url,
        }
    }
}

/// Failures raised by the JSON-LD expansion and compaction primitives.
#[derive(Debug, thiserror::Error)]
pub enum JsonLdError {
    /// The document (or a remote context) could not be loaded.
    #[error("loading document failed: {0}")]
    Loading(#[from] ResolutionError),

    #[error("invalid @context: {0}")]
    InvalidContext(String),

    #[error("invalid remote context {0}: document has no @context")]
    InvalidRemoteContext(String),

    /// A context transitively includes itself.
    #[error("recursive context inclusion: {0}")]
    RecursiveContext(String),

    #[error("invalid term definition for '{term}': {message}")]
    InvalidTermDefinition { term: String, message: String },

    /// A keyword entry (`@id`, `@type`, `@value`, ...) has the wrong shape.
    #[error("invalid {keyword} value: {value}")]
    InvalidKeywordValue { keyword: String, value: String },

    /// A reverse property holds something other than node objects.
    #[error("invalid reverse property value for {property}: {value}")]
    InvalidReverseValue { property: String, value: String },

    /// Valid JSON-LD this processor does not implement. Raised instead of
    /// producing output with the construct silently dropped.
    #[error("unsupported JSON-LD feature: {0}")]
    Unsupported(String),
}

/// A mapping file could not be turned into a [`MappingTable`].
///
/// [`MappingTable`]: crate::mapping::MappingTable
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
