//! Cache inspection: `/cache/stats`, `/cache/list`, `DELETE /cache`.

use serde::{Deserialize, Serialize};

/// Response body for `GET /cache/stats`. Keys render as
/// `operation:url:depth`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheStatsResponse {
    pub size: usize,
    pub keys: Vec<String>,
}

/// Response body for `GET /cache/list`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheListResponse {
    pub count: usize,
    pub urls: Vec<String>,
}

/// Response body for `DELETE /cache` and `DELETE /mappings`: how many
/// entries were removed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearedResponse {
    pub cleared: usize,
}
