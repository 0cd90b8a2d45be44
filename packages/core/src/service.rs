//! The resolver as one object: mapping, loading, recursive expansion,
//! compaction, and the result cache wired together.
//!
//! [`LdrService`] is cheap to clone; every clone shares the same mapper,
//! loader, and cache. This is the type the HTTP layer holds in its state.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use crate::cache::{CacheError, CacheKey, Operation, ResultCache};
use crate::compactor::Compactor;
use crate::error::JsonLdError;
use crate::expander::RecursiveExpander;
use crate::jsonld::JsonLdProcessor;
use crate::loader::DocumentLoader;
use crate::mapping::UrlMapper;
use crate::resolver::DocumentResolver;

/// Default expansion depth when a caller does not give one.
pub const DEFAULT_DEPTH: u32 = 2;

/// A computed (or cached) result.
#[derive(Debug, Clone, PartialEq)]
pub struct Computed {
    pub result: Value,
    /// `true` when the value came from the cache.
    pub cached: bool,
}

/// Failures of a service-level operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested document itself could not be loaded or processed.
    #[error(transparent)]
    JsonLd(#[from] JsonLdError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Clone)]
pub struct LdrService {
    mapper: Arc<UrlMapper>,
    expander: RecursiveExpander,
    compactor: Compactor,
    cache: Arc<dyn ResultCache>,
}

impl LdrService {
    /// Assemble a service around an arbitrary loader. The loader is expected
    /// to apply `mapper` itself.
    pub fn new(
        mapper: Arc<UrlMapper>,
        loader: Arc<dyn DocumentLoader>,
        cache: Arc<dyn ResultCache>,
    ) -> Self {
        let processor = Arc::new(JsonLdProcessor::new(loader));
        let expander = RecursiveExpander::new(processor);
        let compactor = Compactor::new(expander.clone());
        Self {
            mapper,
            expander,
            compactor,
            cache,
        }
    }

    /// The production wiring: a [`DocumentResolver`] over `mapper`.
    pub fn with_resolver(
        mapper: Arc<UrlMapper>,
        cache: Arc<dyn ResultCache>,
    ) -> Result<Self, reqwest::Error> {
        let resolver = DocumentResolver::new(Arc::clone(&mapper))?;
        Ok(Self::new(mapper, Arc::new(resolver), cache))
    }

    pub fn mapper(&self) -> &Arc<UrlMapper> {
        &self.mapper
    }

    pub fn cache(&self) -> &Arc<dyn ResultCache> {
        &self.cache
    }

    /// Recursively expand `url` to `depth`, serving from cache when possible.
    pub async fn expand(&self, url: &str, depth: u32) -> Result<Computed, ServiceError> {
        let key = CacheKey::new(Operation::Expand, url, depth);
        self.cached(key, self.expander.expand(url, depth)).await
    }

    /// Expand then compact `url`, serving from cache when possible.
    pub async fn compact(&self, url: &str, depth: u32) -> Result<Computed, ServiceError> {
        let key = CacheKey::new(Operation::Compact, url, depth);
        self.cached(key, self.compactor.compact(url, depth)).await
    }

    /// Look `key` up; on a miss, run `compute` and store its result.
    /// Failed computations are not stored.
    async fn cached<F>(&self, key: CacheKey, compute: F) -> Result<Computed, ServiceError>
    where
        F: Future<Output = Result<Value, JsonLdError>>,
    {
        if let Some(result) = self.cache.get(&key).await? {
            info!("cache hit: {key}");
            return Ok(Computed {
                result,
                cached: true,
            });
        }

        info!("cache miss: {key}");
        let result = compute.await?;
        self.cache.put(key, result.clone()).await?;
        Ok(Computed {
            result,
            cached: false,
        })
    }
}
