//! Recursive expansion followed by re-compaction against the document's own
//! context.

use serde_json::Value;

use crate::error::JsonLdError;
use crate::expander::RecursiveExpander;

#[derive(Clone)]
pub struct Compactor {
    expander: RecursiveExpander,
}

impl Compactor {
    pub fn new(expander: RecursiveExpander) -> Self {
        Self { expander }
    }

    /// Expand `url` to `max_depth`, then compact the tree using `url` itself
    /// as the context: the processor loads it (mapping included) and applies
    /// its `@context`, so relative context references resolve next to the
    /// document.
    ///
    /// Returns the `@graph` member when compaction produced one. Inline
    /// `_error` markers do not survive compaction.
    pub async fn compact(&self, url: &str, max_depth: u32) -> Result<Value, JsonLdError> {
        let expanded = self.expander.expand(url, max_depth).await?;
        let mut compacted = self
            .expander
            .processor()
            .compact(&expanded, &Value::String(url.to_string()))
            .await?;

        Ok(match compacted.get_mut("@graph") {
            Some(graph) => graph.take(),
            None => compacted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jsonld::JsonLdProcessor;
    use crate::loader::StaticLoader;
    use serde_json::json;
    use std::sync::Arc;

    fn compactor(loader: StaticLoader) -> Compactor {
        Compactor::new(RecursiveExpander::new(Arc::new(JsonLdProcessor::new(
            Arc::new(loader),
        ))))
    }

    fn context() -> Value {
        json!({
            "@vocab": "http://schema.org/",
            "knows": {"@type": "@id"}
        })
    }

    #[tokio::test]
    async fn compacts_with_the_documents_own_context() {
        let loader = StaticLoader::new()
            .with_document(
                "http://example.org/a",
                json!({
                    "@context": context(),
                    "@id": "http://example.org/a",
                    "name": "A",
                    "knows": "http://example.org/b"
                }),
            )
            .with_document(
                "http://example.org/b",
                json!({"@context": context(), "@id": "http://example.org/b", "name": "B"}),
            );

        let result = compactor(loader)
            .compact("http://example.org/a", 2)
            .await
            .unwrap();
        assert_eq!(
            result,
            json!({
                "@context": "http://example.org/a",
                "@id": "http://example.org/a",
                "name": "A",
                "knows": {"@id": "http://example.org/b", "name": "B"}
            })
        );
    }

    #[tokio::test]
    async fn error_markers_are_dropped() {
        let loader = StaticLoader::new().with_document(
            "http://example.org/a",
            json!({
                "@context": context(),
                "@id": "http://example.org/a",
                "knows": "http://example.org/gone"
            }),
        );
        let result = compactor(loader)
            .compact("http://example.org/a", 2)
            .await
            .unwrap();
        assert_eq!(result["knows"], "http://example.org/gone");
    }

    #[tokio::test]
    async fn graph_member_is_returned() {
        let loader = StaticLoader::new().with_document(
            "http://example.org/list",
            json!({
                "@context": {"@vocab": "http://schema.org/"},
                "@graph": [
                    {"@id": "http://example.org/1", "name": "one"},
                    {"@id": "http://example.org/2", "name": "two"}
                ]
            }),
        );
        let result = compactor(loader)
            .compact("http://example.org/list", 1)
            .await
            .unwrap();
        assert_eq!(
            result,
            json!([
                {"@id": "http://example.org/1", "name": "one"},
                {"@id": "http://example.org/2", "name": "two"}
            ])
        );
    }
}
