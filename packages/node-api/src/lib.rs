//! Request and response types for the ldr HTTP API.
//!
//! Shared by `ldr-server` (which produces these bodies) and the `ldr` CLI
//! and conformance suite (which consume them).
//!
//! # Endpoints covered
//!
//! | Method | Path | Type |
//! |--------|------|------|
//! | POST | `/expand` | [`DocumentRequest`] → [`ResultResponse`] |
//! | POST | `/compact` | [`DocumentRequest`] → [`ResultResponse`] |
//! | GET | `/health` | → [`HealthResponse`] |
//! | GET | `/mappings` | → [`MappingsResponse`] |
//! | POST | `/mappings` | [`SetMappingsRequest`] → [`SetMappingsResponse`] |
//! | DELETE | `/mappings` | → [`ClearedResponse`] |
//! | GET | `/cache/stats` | → [`CacheStatsResponse`] |
//! | GET | `/cache/list` | → [`CacheListResponse`] |
//! | DELETE | `/cache` | → [`ClearedResponse`] |

pub mod cache;
pub mod documents;
pub mod error;
pub mod health;
pub mod mappings;

pub use cache::{CacheListResponse, CacheStatsResponse, ClearedResponse};
pub use documents::{DocumentRequest, ResultResponse};
pub use error::ErrorResponse;
pub use health::HealthResponse;
pub use mappings::{MappingsResponse, SetMappingsRequest, SetMappingsResponse};
