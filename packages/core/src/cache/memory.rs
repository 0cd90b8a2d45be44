//! In-memory result cache.
//!
//! Entries are held in a [`BTreeMap`] behind a [`RwLock`] and are lost when
//! the process exits. Ordered keys make listings deterministic.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use super::{CacheError, CacheKey, ResultCache};

/// Thread-safe, in-memory implementation of [`ResultCache`].
pub struct MemoryCache {
    entries: RwLock<BTreeMap<CacheKey, Value>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> CacheError {
    CacheError::Internal("cache lock poisoned".into())
}

#[async_trait]
impl ResultCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<Value>, CacheError> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: CacheKey, value: Value) -> Result<(), CacheError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key, value);
        Ok(())
    }

    async fn clear(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }

    async fn len(&self) -> Result<usize, CacheError> {
        Ok(self.entries.read().map_err(poisoned)?.len())
    }

    async fn keys(&self) -> Result<Vec<CacheKey>, CacheError> {
        Ok(self.entries.read().map_err(poisoned)?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Operation;
    use serde_json::json;

    fn key(op: Operation, url: &str, depth: u32) -> CacheKey {
        CacheKey::new(op, url, depth)
    }

    #[tokio::test]
    async fn put_then_get() {
        let cache = MemoryCache::new();
        let k = key(Operation::Expand, "http://example.org/a", 2);
        assert_eq!(cache.get(&k).await.unwrap(), None);

        cache.put(k.clone(), json!({"a": 1})).await.unwrap();
        assert_eq!(cache.get(&k).await.unwrap(), Some(json!({"a": 1})));
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let cache = MemoryCache::new();
        let k = key(Operation::Compact, "http://example.org/a", 1);
        cache.put(k.clone(), json!(1)).await.unwrap();
        cache.put(k.clone(), json!(2)).await.unwrap();
        assert_eq!(cache.get(&k).await.unwrap(), Some(json!(2)));
        assert_eq!(cache.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn depth_is_part_of_the_key() {
        let cache = MemoryCache::new();
        cache
            .put(key(Operation::Expand, "http://example.org/a", 1), json!("shallow"))
            .await
            .unwrap();
        assert_eq!(
            cache
                .get(&key(Operation::Expand, "http://example.org/a", 2))
                .await
                .unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn clear_reports_removed_count() {
        let cache = MemoryCache::new();
        cache.put(key(Operation::Expand, "u1", 2), json!(1)).await.unwrap();
        cache.put(key(Operation::Compact, "u1", 2), json!(2)).await.unwrap();
        assert_eq!(cache.clear().await.unwrap(), 2);
        assert!(cache.is_empty().await.unwrap());
        assert_eq!(cache.clear().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn keys_are_ordered() {
        let cache = MemoryCache::new();
        cache.put(key(Operation::Compact, "b", 2), json!(1)).await.unwrap();
        cache.put(key(Operation::Expand, "b", 2), json!(1)).await.unwrap();
        cache.put(key(Operation::Expand, "a", 2), json!(1)).await.unwrap();

        let listed: Vec<String> = cache
            .keys()
            .await
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(listed, vec!["expand:a:2", "expand:b:2", "compact:b:2"]);
    }
}
