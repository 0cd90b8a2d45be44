//! The document-loading capability consumed by the JSON-LD primitives.
//!
//! Anything that can turn a URL into a parsed JSON document implements
//! [`DocumentLoader`]. The production implementation is
//! [`DocumentResolver`](crate::resolver::DocumentResolver); [`StaticLoader`]
//! serves a fixed set of documents from memory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ResolutionError;
use crate::mapping::UrlMapper;

/// A loaded document together with the URL it was actually read from.
///
/// `document_url` is the base against which relative IRIs and relative
/// `@context` references inside `document` are resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteDocument {
    pub document: Value,
    pub document_url: String,
}

impl RemoteDocument {
    pub fn new(document: Value, document_url: impl Into<String>) -> Self {
        Self {
            document,
            document_url: document_url.into(),
        }
    }
}

/// Loads documents and remote contexts by URL.
#[async_trait]
pub trait DocumentLoader: Send + Sync + 'static {
    async fn load(&self, url: &str) -> Result<RemoteDocument, ResolutionError>;
}

/// In-memory loader keyed by URL.
///
/// When a mapper is attached, requested URLs are rewritten through it before
/// the lookup, and the mapped URL is reported as `document_url`.
#[derive(Default)]
pub struct StaticLoader {
    documents: HashMap<String, Value>,
    mapper: Option<Arc<UrlMapper>>,
}

impl StaticLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mapper(mut self, mapper: Arc<UrlMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Register (or replace) the document served for `url`.
    pub fn with_document(mut self, url: impl Into<String>, document: Value) -> Self {
        self.documents.insert(url.into(), document);
        self
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self, url: &str) -> Result<RemoteDocument, ResolutionError> {
        let resolved = match &self.mapper {
            Some(mapper) => mapper.map(url),
            None => url.to_string(),
        };
        match self.documents.get(&resolved) {
            Some(document) => Ok(RemoteDocument::new(document.clone(), resolved)),
            None => Err(ResolutionError::Missing { url: resolved }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingTable;
    use serde_json::json;

    #[tokio::test]
    async fn static_loader_serves_registered_documents() {
        let loader = StaticLoader::new().with_document("http://example.org/a", json!({"x": 1}));
        let doc = loader.load("http://example.org/a").await.unwrap();
        assert_eq!(doc.document, json!({"x": 1}));
        assert_eq!(doc.document_url, "http://example.org/a");

        let err = loader.load("http://example.org/b").await.unwrap_err();
        assert_eq!(err.url(), "http://example.org/b");
    }

    #[tokio::test]
    async fn static_loader_applies_mapper() {
        let mapper = Arc::new(UrlMapper::new(
            MappingTable::new().with("http://example.org/*", "mem:${rest}"),
        ));
        let loader = StaticLoader::new()
            .with_mapper(mapper)
            .with_document("mem:a", json!({"y": 2}));
        let doc = loader.load("http://example.org/a").await.unwrap();
        assert_eq!(doc.document_url, "mem:a");
        assert_eq!(doc.document, json!({"y": 2}));
    }
}
