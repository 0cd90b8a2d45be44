//! Result cache for finished expand/compact computations.
//!
//! The [`ResultCache`] trait is the contract between the service layer and
//! whatever holds the results. Entries are keyed by [`CacheKey`]: the
//! operation, the URL exactly as requested (before mapping), and the depth.
//! There is no eviction or expiry; entries live until [`ResultCache::clear`].
//!
//! # Implementations
//!
//! | Type | When to use |
//! |------|-------------|
//! | [`MemoryCache`] | The server and tests; process-lifetime only |
//!
//! [`MemoryCache`]: memory::MemoryCache

pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use memory::MemoryCache;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// An unexpected error in the underlying cache backend.
    #[error("internal cache error: {0}")]
    Internal(String),
}

// ---------------------------------------------------------------------------
// CacheKey
// ---------------------------------------------------------------------------

/// Which computation a cache entry holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Expand,
    Compact,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Expand => f.write_str("expand"),
            Operation::Compact => f.write_str("compact"),
        }
    }
}

/// Identity of a cached result. Displays as `operation:url:depth`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CacheKey {
    pub operation: Operation,
    pub url: String,
    pub depth: u32,
}

impl CacheKey {
    pub fn new(operation: Operation, url: impl Into<String>, depth: u32) -> Self {
        Self {
            operation,
            url: url.into(),
            depth,
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.operation, self.url, self.depth)
    }
}

// ---------------------------------------------------------------------------
// ResultCache trait
// ---------------------------------------------------------------------------

#[async_trait]
pub trait ResultCache: Send + Sync + 'static {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError>;

    /// Insert or overwrite the entry for `key`.
    async fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError>;

    /// Remove every entry, returning how many there were.
    async fn clear(&self) -> Result<usize, CacheError>;

    async fn len(&self) -> Result<usize, CacheError>;

    async fn is_empty(&self) -> Result<bool, CacheError> {
        Ok(self.len().await? == 0)
    }

    /// All keys currently stored, in key order.
    async fn keys(&self) -> Result<Vec<CacheKey>, CacheError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_display_joins_parts() {
        let key = CacheKey::new(Operation::Compact, "https://example.org/a:b", 2);
        assert_eq!(key.to_string(), "compact:https://example.org/a:b:2");
    }

    #[test]
    fn keys_differing_in_any_part_are_distinct() {
        let base = CacheKey::new(Operation::Expand, "http://x", 2);
        assert_ne!(base, CacheKey::new(Operation::Compact, "http://x", 2));
        assert_ne!(base, CacheKey::new(Operation::Expand, "http://y", 2));
        assert_ne!(base, CacheKey::new(Operation::Expand, "http://x", 3));
    }

    #[test]
    fn operation_serializes_lowercase() {
        assert_eq!(serde_json::to_value(Operation::Expand).unwrap(), "expand");
    }
}
