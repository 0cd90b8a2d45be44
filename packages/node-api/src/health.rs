//! Liveness: `GET /health`.

use serde::{Deserialize, Serialize};

/// ```json
/// { "status": "ok", "cache_size": 4, "mappings_count": 12 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers at all.
    pub status: String,
    pub cache_size: usize,
    pub mappings_count: usize,
}
