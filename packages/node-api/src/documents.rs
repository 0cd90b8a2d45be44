//! Expand and compact requests: `POST /expand`, `POST /compact`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /expand` and `POST /compact`.
///
/// `url` is optional at the type level so the server can answer a missing
/// URL with its own 400 body instead of a deserialization rejection.
///
/// ```json
/// { "url": "https://example.org/doc.jsonld", "depth": 3 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Recursion budget in documents. Absent means the server default (2);
    /// `0` returns the bare reference without fetching anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

impl DocumentRequest {
    pub fn new(url: impl Into<String>, depth: Option<u32>) -> Self {
        Self {
            url: Some(url.into()),
            depth,
        }
    }
}

/// Response body for `POST /expand` and `POST /compact`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResultResponse {
    pub result: Value,

    /// `true` when the result was served from the cache.
    pub cached: bool,
}
