//! A compact JSON-LD 1.1 expansion/compaction engine.
//!
//! This covers the subset of the W3C algorithms the resolver relies on:
//! context processing with remote contexts, term and IRI expansion, type
//! coercion, reverse properties, `@list`/`@set`/`@graph` containers, index,
//! language, `@id` and `@type` maps, scoped contexts, and the inverse
//! operations for compaction. Remote documents and contexts are fetched
//! through an injected [`DocumentLoader`], so every fetch goes through the
//! same mapping and loading rules as top-level documents.
//!
//! Constructs outside that subset (`@nest`, `@included`, `@json`,
//! `@direction`, `@import`, `@propagate`, combined containers) fail with
//! [`JsonLdError::Unsupported`] rather than being dropped.

pub mod compact;
pub mod context;
pub mod expand;

use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::error::JsonLdError;
use crate::loader::DocumentLoader;

pub use context::{ContainerType, Context, TermDefinition};

/// Expansion and compaction bound to a document loader.
#[derive(Clone)]
pub struct JsonLdProcessor {
    loader: Arc<dyn DocumentLoader>,
}

impl JsonLdProcessor {
    pub fn new(loader: Arc<dyn DocumentLoader>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<dyn DocumentLoader> {
        &self.loader
    }

    /// Load `url` and expand it, resolving relative references against the
    /// URL the document was actually read from.
    pub async fn expand_url(&self, url: &str) -> Result<Value, JsonLdError> {
        let remote = self.loader.load(url).await?;
        self.expand(&remote.document, Some(&remote.document_url))
            .await
    }

    /// Expand an in-memory document. The result is always an array.
    pub async fn expand(&self, document: &Value, base: Option<&str>) -> Result<Value, JsonLdError> {
        expand::expand_document(document, base, self.loader.as_ref()).await
    }

    /// Compact `input` against `context`.
    ///
    /// `context` may be a context object, an array, or a URL string whose
    /// document's `@context` is used. The input is expanded first, so it may
    /// be in any JSON-LD form.
    pub async fn compact(&self, input: &Value, context: &Value) -> Result<Value, JsonLdError> {
        let expanded = self.expand(input, None).await?;

        // A bare URL as context resolves relative to itself.
        let base = context.as_str();
        let mut active = Context::new(base);
        active.process(context, base, self.loader.as_ref()).await?;

        Ok(compact::compact_document(&expanded, &active, context))
    }
}

const KEYWORDS: &[&str] = &[
    "@base",
    "@container",
    "@context",
    "@direction",
    "@graph",
    "@id",
    "@included",
    "@index",
    "@json",
    "@language",
    "@list",
    "@nest",
    "@none",
    "@prefix",
    "@propagate",
    "@protected",
    "@reverse",
    "@set",
    "@type",
    "@value",
    "@version",
    "@vocab",
];

pub fn is_keyword(value: &str) -> bool {
    KEYWORDS.contains(&value)
}

/// `true` if `value` starts with a URI scheme (`scheme:`).
pub fn is_absolute_iri(value: &str) -> bool {
    let Some((scheme, _)) = value.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

pub fn is_blank_node(value: &str) -> bool {
    value.starts_with("_:")
}

/// Resolve `reference` against `base`. Absolute references, and references
/// with no usable base, come back unchanged.
pub fn resolve_relative(base: Option<&str>, reference: &str) -> String {
    if is_absolute_iri(reference) {
        return reference.to_string();
    }
    base.and_then(|b| Url::parse(b).ok())
        .and_then(|b| b.join(reference).ok())
        .map(String::from)
        .unwrap_or_else(|| reference.to_string())
}
