//! Recursive, depth-bounded expansion of a document and everything it links
//! to.
//!
//! A top-level [`RecursiveExpander::expand`] call creates one
//! [`ExpansionContext`] holding the depth budget and the visited set, so a
//! URL is fetched at most once per call tree. A later top-level call starts
//! from a fresh context.
//!
//! Documents are fetched one depth level at a time. Before a level is
//! fetched, its references are claimed in document order (parents in the
//! order they were claimed, then each parent's references in order), so
//! which occurrence of a shared URL is inlined never depends on how fast
//! the fetches complete. All fetches of a level run concurrently. The tree
//! is then assembled from the fetched documents by the [`walk`]er.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::JsonLdError;
use crate::jsonld::JsonLdProcessor;
use crate::walker::{references, walk, ReferenceExpander};

/// Per-call state of one top-level expansion.
#[derive(Debug)]
pub struct ExpansionContext {
    max_depth: u32,
    visited: HashSet<String>,
}

impl ExpansionContext {
    pub fn new(max_depth: u32) -> Self {
        Self {
            max_depth,
            visited: HashSet::new(),
        }
    }

    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Mark `url` visited. Returns `false` if it already was.
    pub fn visit(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }
}

/// Expands documents and inlines the references they contain.
#[derive(Clone)]
pub struct RecursiveExpander {
    processor: Arc<JsonLdProcessor>,
}

impl RecursiveExpander {
    pub fn new(processor: Arc<JsonLdProcessor>) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &Arc<JsonLdProcessor> {
        &self.processor
    }

    /// Expand `url` and inline its references up to `max_depth` documents
    /// deep.
    ///
    /// With `max_depth == 0` nothing is fetched and the result is the bare
    /// reference `{"@id": url}`. A failure to load or expand `url` itself is
    /// returned as an error; failures further down become inline `_error`
    /// markers.
    pub async fn expand(&self, url: &str, max_depth: u32) -> Result<Value, JsonLdError> {
        let mut cx = ExpansionContext::new(max_depth);
        if max_depth == 0 {
            return Ok(json!({ "@id": url }));
        }
        cx.visit(url);
        let root = self.load(url).await?;

        let mut tree = Assembly::default();
        tree.documents.insert(url.to_string(), Ok(root));
        let mut frontier = vec![url.to_string()];

        // References found in documents at depth `level - 1` sit at `level`.
        for level in 1..cx.max_depth() {
            let mut claimed = Vec::new();
            for parent in &frontier {
                let Some(Ok(document)) = tree.documents.get(parent) else {
                    continue;
                };
                let plan = references(document)
                    .into_iter()
                    .map(|target| {
                        let first = cx.visit(target);
                        if first {
                            claimed.push(target.to_string());
                        } else {
                            debug!(url = target, "already visited, leaving as reference");
                        }
                        first
                    })
                    .collect();
                tree.plans.insert(parent.clone(), plan);
            }
            if claimed.is_empty() {
                break;
            }

            debug!(level, count = claimed.len(), "fetching level");
            let loaded = join_all(claimed.iter().map(|target| self.load(target))).await;
            tree.documents.extend(claimed.iter().cloned().zip(loaded));
            frontier = claimed;
        }

        Ok(tree.inline(url))
    }

    /// Load and expand one document, unwrapping a single-node result.
    async fn load(&self, url: &str) -> Result<Value, JsonLdError> {
        let expanded = self.processor.expand_url(url).await?;
        Ok(match expanded {
            Value::Array(mut items) if items.len() == 1 => items.pop().unwrap_or(Value::Null),
            other => other,
        })
    }
}

/// The documents fetched for one call, and for each one which of its
/// references (in document order) it inlines.
#[derive(Default)]
struct Assembly {
    documents: HashMap<String, Result<Value, JsonLdError>>,
    plans: HashMap<String, Vec<bool>>,
    /// Remaining decisions of the documents currently being walked.
    cursors: Vec<std::vec::IntoIter<bool>>,
}

impl Assembly {
    /// The walked content of `url`. Each fetched document is used once.
    fn inline(&mut self, url: &str) -> Value {
        match self.documents.remove(url) {
            Some(Ok(document)) => {
                let plan = self.plans.remove(url).unwrap_or_default();
                self.cursors.push(plan.into_iter());
                let walked = walk(self, &document);
                self.cursors.pop();
                walked
            }
            Some(Err(e)) => {
                warn!(url, error = %e, "reference expansion failed");
                json!({ "@id": url, "_error": e.to_string() })
            }
            None => json!({ "@id": url }),
        }
    }
}

impl ReferenceExpander for Assembly {
    fn expand_reference(&mut self, url: &str) -> Option<Value> {
        let claimed = self
            .cursors
            .last_mut()
            .and_then(Iterator::next)
            .unwrap_or(false);
        claimed.then(|| self.inline(url))
    }
}
