//! Recursive JSON-LD resolution: expand a document, inline the documents it
//! links to up to a depth budget, and optionally compact the result again.
//!
//! This crate is the library behind the `ldr-server` HTTP service and the
//! `ldr` CLI. It has no HTTP server of its own.
//!
//! # Crate layout
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`mapping`] | URL rewriting table with wildcards and chained redirects |
//! | [`loader`] | The [`DocumentLoader`] capability and an in-memory loader |
//! | [`resolver`] | [`DocumentResolver`]: mapping, then local file or HTTP fetch |
//! | [`jsonld`] | JSON-LD context processing, expansion, and compaction |
//! | [`walker`] | Shape classification and ordered tree traversal |
//! | [`expander`] | Depth-bounded, level-by-level expansion with a visited set |
//! | [`compactor`] | Expansion followed by compaction against the source context |
//! | [`cache`] | [`ResultCache`] trait and [`MemoryCache`] |
//! | [`service`] | [`LdrService`]: everything above behind two cached calls |
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ldr::{LdrService, MappingTable, MemoryCache, UrlMapper};
//!
//! let mapper = Arc::new(UrlMapper::new(
//!     MappingTable::new().with("https://w3id.org/example/*", "./vocab/${rest}.jsonld"),
//! ));
//! let service = LdrService::with_resolver(mapper, Arc::new(MemoryCache::new()))?;
//!
//! let expanded = service.expand("https://w3id.org/example/thing", 2).await?;
//! println!("{}", serde_json::to_string_pretty(&expanded.result)?);
//! ```

pub mod cache;
pub mod compactor;
pub mod error;
pub mod expander;
pub mod jsonld;
pub mod loader;
pub mod mapping;
pub mod resolver;
pub mod service;
pub mod walker;

pub use cache::{CacheError, CacheKey, MemoryCache, Operation, ResultCache};
pub use compactor::Compactor;
pub use error::{JsonLdError, MappingError, ResolutionError};
pub use expander::{ExpansionContext, RecursiveExpander};
pub use jsonld::JsonLdProcessor;
pub use loader::{DocumentLoader, RemoteDocument, StaticLoader};
pub use mapping::{MappedUrl, MappingTable, UrlMapper};
pub use resolver::DocumentResolver;
pub use service::{Computed, LdrService, ServiceError, DEFAULT_DEPTH};
pub use walker::{references, walk, ReferenceExpander, Shape};
