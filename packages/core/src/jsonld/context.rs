use std::collections::{HashMap, HashSet};

use futures::future::BoxFuture;
use serde_json::{Map, Value};

use super::{is_absolute_iri, is_keyword, resolve_relative};
use crate::error::JsonLdError;
use crate::loader::DocumentLoader;

/// Upper bound on nested remote context loads within one processing call.
const MAX_CONTEXT_DEPTH: usize = 32;

/// An active JSON-LD context: term definitions plus defaults.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub terms: HashMap<String, TermDefinition>,
    pub vocab: Option<String>,
    /// Base IRI for document-relative references (`@id` values).
    pub base: Option<String>,
    pub default_language: Option<String>,
    original_base: Option<String>,
}

/// A single term definition.
#[derive(Clone, Debug, PartialEq)]
pub struct TermDefinition {
    /// Expanded IRI or keyword. Empty for a term explicitly mapped to `null`.
    pub iri: String,
    pub type_mapping: Option<String>,
    pub container: Option<ContainerType>,
    /// `Some(None)` is an explicit `"@language": null`.
    pub language: Option<Option<String>>,
    /// Scoped context, processed lazily when the term is used.
    pub context: Option<Value>,
    /// Base the scoped context's relative references resolve against.
    pub context_base: Option<String>,
    /// Usable as the prefix of a compact IRI.
    pub prefix: bool,
    /// Defined with `@reverse`: values are subjects pointing at the node.
    pub reverse: bool,
}

impl TermDefinition {
    fn simple(iri: String) -> Self {
        Self {
            iri,
            type_mapping: None,
            container: None,
            language: None,
            context: None,
            context_base: None,
            prefix: false,
            reverse: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContainerType {
    Set,
    List,
    Graph,
    Index,
    Language,
    /// Node objects keyed by their `@id`.
    Id,
    /// Node objects keyed by one of their types.
    Type,
}

impl ContainerType {
    /// Parse an `@container` value. `@set` next to another container adds
    /// nothing here, since every expanded value is an array anyway.
    fn parse(term: &str, value: &Value) -> Result<Option<Self>, JsonLdError> {
        let invalid = || JsonLdError::InvalidTermDefinition {
            term: term.to_string(),
            message: format!("invalid @container {value}"),
        };
        let names: Vec<&str> = match value {
            Value::Null => return Ok(None),
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_str().ok_or_else(invalid))
                .collect::<Result<_, _>>()?,
            _ => return Err(invalid()),
        };

        let mut kinds = names
            .iter()
            .filter(|name| **name != "@set")
            .map(|name| match *name {
                "@list" => Ok(ContainerType::List),
                "@graph" => Ok(ContainerType::Graph),
                "@index" => Ok(ContainerType::Index),
                "@language" => Ok(ContainerType::Language),
                "@id" => Ok(ContainerType::Id),
                "@type" => Ok(ContainerType::Type),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        match kinds.len() {
            0 if names.is_empty() => Ok(None),
            0 => Ok(Some(ContainerType::Set)),
            1 => Ok(kinds.pop()),
            _ => Err(JsonLdError::Unsupported(format!(
                "combined @container {value} on '{term}'"
            ))),
        }
    }
}

impl Context {
    /// An empty context whose base is `base`.
    pub fn new(base: Option<&str>) -> Self {
        Self {
            base: base.map(str::to_string),
            original_base: base.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn get_term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }

    /// Process a `@context` value (URL, object, array, or `null`) on top of
    /// this context. `base` resolves relative context URLs.
    pub async fn process(
        &mut self,
        value: &Value,
        base: Option<&str>,
        loader: &dyn DocumentLoader,
    ) -> Result<(), JsonLdError> {
        let mut stack = Vec::new();
        self.process_with(value, base.map(str::to_string), loader, &mut stack)
            .await
    }

    /// A copy of this context with `scoped` layered on top.
    pub async fn with_scoped(
        &self,
        scoped: &Value,
        base: Option<&str>,
        loader: &dyn DocumentLoader,
    ) -> Result<Context, JsonLdError> {
        let mut child = self.clone();
        child.process(scoped, base, loader).await?;
        Ok(child)
    }

    fn process_with<'a>(
        &'a mut self,
        value: &'a Value,
        base: Option<String>,
        loader: &'a dyn DocumentLoader,
        stack: &'a mut Vec<String>,
    ) -> BoxFuture<'a, Result<(), JsonLdError>> {
        Box::pin(async move {
            match value {
                Value::Array(items) => {
                    for item in items {
                        self.process_with(item, base.clone(), loader, stack).await?;
                    }
                }
                Value::Null => self.reset(),
                Value::String(reference) => {
                    let url = resolve_relative(base.as_deref(), reference);
                    if stack.contains(&url) {
                        return Err(JsonLdError::RecursiveContext(url));
                    }
                    if stack.len() >= MAX_CONTEXT_DEPTH {
                        return Err(JsonLdError::InvalidContext(format!(
                            "context nesting deeper than {MAX_CONTEXT_DEPTH} at {url}"
                        )));
                    }

                    let remote = loader.load(&url).await?;
                    let inner = remote
                        .document
                        .get("@context")
                        .cloned()
                        .ok_or_else(|| JsonLdError::InvalidRemoteContext(url.clone()))?;

                    stack.push(url);
                    let result = self
                        .process_with(&inner, Some(remote.document_url), loader, stack)
                        .await;
                    stack.pop();
                    result?;
                }
                Value::Object(map) => self.process_object(map, base.as_deref())?,
                other => {
                    return Err(JsonLdError::InvalidContext(format!(
                        "unsupported @context value: {other}"
                    )))
                }
            }
            Ok(())
        })
    }

    fn reset(&mut self) {
        self.terms.clear();
        self.vocab = None;
        self.default_language = None;
        self.base = self.original_base.clone();
    }

    fn process_object(
        &mut self,
        map: &Map<String, Value>,
        source_base: Option<&str>,
    ) -> Result<(), JsonLdError> {
        if let Some(base) = map.get("@base") {
            self.base = match base {
                Value::String(b) => Some(resolve_relative(self.base.as_deref(), b)),
                _ => None,
            };
        }

        if let Some(vocab) = map.get("@vocab") {
            self.vocab = match vocab {
                Value::String(v) => Some(
                    self.expand_iri(v, true, true)
                        .unwrap_or_else(|| v.to_string()),
                ),
                _ => None,
            };
        }

        if let Some(lang) = map.get("@language") {
            self.default_language = lang.as_str().map(str::to_lowercase);
        }

        for keyword in ["@import", "@propagate", "@direction"] {
            if map.contains_key(keyword) {
                return Err(JsonLdError::Unsupported(format!("{keyword} in a context")));
            }
        }

        let mut defined: HashSet<String> = HashSet::new();
        for key in map.keys() {
            if is_keyword(key) {
                continue;
            }
            self.define_term(map, key, source_base, &mut defined)?;
        }
        Ok(())
    }

    /// Create the definition for `term` from the local context `local`,
    /// defining any term it depends on first.
    fn define_term(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        source_base: Option<&str>,
        defined: &mut HashSet<String>,
    ) -> Result<(), JsonLdError> {
        if !defined.insert(term.to_string()) {
            return Ok(());
        }
        let Some(value) = local.get(term) else {
            return Ok(());
        };

        let invalid = |message: &str| JsonLdError::InvalidTermDefinition {
            term: term.to_string(),
            message: message.to_string(),
        };

        let definition = match value {
            Value::Null => TermDefinition::simple(String::new()),
            Value::String(id) => {
                let iri = self.term_iri(local, term, Some(id), source_base, defined)?;
                let prefix = !term.contains(':') && ends_with_gen_delim(&iri);
                TermDefinition {
                    prefix,
                    ..TermDefinition::simple(iri)
                }
            }
            Value::Object(def) => {
                for key in def.keys() {
                    match key.as_str() {
                        "@id" | "@reverse" | "@type" | "@language" | "@container" | "@context"
                        | "@prefix" | "@protected" => {}
                        "@direction" | "@index" | "@nest" => {
                            return Err(JsonLdError::Unsupported(format!(
                                "{key} in the definition of '{term}'"
                            )))
                        }
                        other => return Err(invalid(&format!("unexpected entry {other}"))),
                    }
                }

                let container = match def.get("@container") {
                    Some(value) => ContainerType::parse(term, value)?,
                    None => None,
                };

                let (iri, reverse) = match def.get("@reverse") {
                    Some(Value::String(reverse)) => {
                        if def.contains_key("@id") {
                            return Err(invalid("@reverse and @id cannot be combined"));
                        }
                        if !matches!(container, None | Some(ContainerType::Set | ContainerType::Index)) {
                            return Err(invalid("a reverse property only takes @set or @index"));
                        }
                        self.dependency(local, reverse, source_base, defined)?;
                        let iri = self
                            .expand_iri(reverse, true, false)
                            .filter(|iri| !is_keyword(iri))
                            .ok_or_else(|| invalid("@reverse must expand to an IRI"))?;
                        (iri, true)
                    }
                    Some(_) => return Err(invalid("@reverse must be a string")),
                    None => {
                        let id = match def.get("@id") {
                            Some(Value::String(id)) => Some(id.as_str()),
                            Some(Value::Null) | None => None,
                            Some(_) => return Err(invalid("@id must be a string")),
                        };
                        (self.term_iri(local, term, id, source_base, defined)?, false)
                    }
                };

                let type_mapping = match def.get("@type") {
                    Some(Value::String(t)) if t == "@json" => {
                        return Err(JsonLdError::Unsupported(format!(
                            "@json literals on '{term}'"
                        )))
                    }
                    Some(Value::String(t)) if is_keyword(t) => Some(t.clone()),
                    Some(Value::String(t)) => {
                        self.dependency(local, t, source_base, defined)?;
                        Some(self.expand_iri(t, true, false).unwrap_or_else(|| t.clone()))
                    }
                    Some(_) => return Err(invalid("@type must be a string")),
                    None => None,
                };

                let language = def
                    .get("@language")
                    .map(|l| l.as_str().map(str::to_lowercase));

                let prefix = match def.get("@prefix") {
                    Some(Value::Bool(b)) => *b,
                    _ => false,
                };

                TermDefinition {
                    iri,
                    type_mapping,
                    container,
                    language,
                    context: def.get("@context").cloned(),
                    context_base: source_base.map(str::to_string),
                    prefix,
                    reverse,
                }
            }
            _ => return Err(invalid("definition must be a string, object, or null")),
        };

        self.terms.insert(term.to_string(), definition);
        Ok(())
    }

    /// The IRI a term maps to: its explicit `@id`, or the term itself
    /// expanded as a compact IRI or against `@vocab`.
    fn term_iri(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        id: Option<&str>,
        source_base: Option<&str>,
        defined: &mut HashSet<String>,
    ) -> Result<String, JsonLdError> {
        let source = id.unwrap_or(term);
        if is_keyword(source) {
            return Ok(source.to_string());
        }
        self.dependency(local, source, source_base, defined)?;
        // A term naming itself as its own @id (`"name": "name"`) needs vocab.
        let expanded = if id.is_some() && source != term {
            self.expand_iri(source, true, false)
        } else {
            self.expand_iri_without_term(source, term)
        };
        expanded.ok_or_else(|| JsonLdError::InvalidTermDefinition {
            term: term.to_string(),
            message: format!("cannot expand {source} to an IRI"),
        })
    }

    /// `source` as an IRI, ignoring any existing definition of `term` itself.
    fn expand_iri_without_term(&self, source: &str, term: &str) -> Option<String> {
        if source != term {
            return self.expand_iri(source, true, false);
        }
        if let Some((prefix, suffix)) = source.split_once(':') {
            if let Some(def) = self.terms.get(prefix).filter(|d| !d.iri.is_empty()) {
                return Some(format!("{}{suffix}", def.iri));
            }
            if is_absolute_iri(source) || prefix == "_" {
                return Some(source.to_string());
            }
        }
        self.vocab.as_ref().map(|v| format!("{v}{source}"))
    }

    /// Make sure the prefix (or term) `value` depends on is defined first.
    fn dependency(
        &mut self,
        local: &Map<String, Value>,
        value: &str,
        source_base: Option<&str>,
        defined: &mut HashSet<String>,
    ) -> Result<(), JsonLdError> {
        let dependency = value.split_once(':').map_or(value, |(prefix, _)| prefix);
        if local.contains_key(dependency) {
            self.define_term(local, dependency, source_base, defined)?;
        }
        Ok(())
    }

    /// Expand `value` to an absolute IRI or keyword.
    ///
    /// `vocab` enables term lookup and `@vocab` fallback (property names and
    /// types); `document_relative` resolves against the base (`@id` values).
    pub fn expand_iri(&self, value: &str, vocab: bool, document_relative: bool) -> Option<String> {
        if is_keyword(value) {
            return Some(value.to_string());
        }

        if vocab {
            if let Some(def) = self.terms.get(value) {
                return (!def.iri.is_empty()).then(|| def.iri.clone());
            }
        }

        if let Some((prefix, suffix)) = value.split_once(':') {
            if prefix == "_" || suffix.starts_with("//") {
                return Some(value.to_string());
            }
            if let Some(def) = self.terms.get(prefix).filter(|d| !d.iri.is_empty()) {
                return Some(format!("{}{suffix}", def.iri));
            }
            if is_absolute_iri(value) {
                return Some(value.to_string());
            }
        }

        if vocab {
            if let Some(v) = &self.vocab {
                return Some(format!("{v}{value}"));
            }
        }

        if document_relative {
            return Some(resolve_relative(self.base.as_deref(), value));
        }

        None
    }
}

/// JSON-LD 1.1 only treats simple terms ending in a gen-delim as prefixes.
fn ends_with_gen_delim(iri: &str) -> bool {
    iri.ends_with(['/', '#', ':', '?', '[', ']', '@'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;
    use serde_json::json;

    async fn processed(context: Value, loader: &StaticLoader) -> Context {
        let mut ctx = Context::new(Some("http://example.org/doc"));
        ctx.process(&context, Some("http://example.org/doc"), loader)
            .await
            .unwrap();
        ctx
    }

    #[tokio::test]
    async fn terms_prefixes_and_vocab() {
        let ctx = processed(
            json!({
                "@vocab": "http://schema.org/",
                "ex": "http://example.org/ns#",
                "knows": {"@id": "ex:knows", "@type": "@id"},
                "tags": {"@id": "ex:tag", "@container": "@set"}
            }),
            &StaticLoader::new(),
        )
        .await;

        assert_eq!(ctx.expand_iri("name", true, false).as_deref(), Some("http://schema.org/name"));
        assert_eq!(
            ctx.expand_iri("knows", true, false).as_deref(),
            Some("http://example.org/ns#knows")
        );
        assert_eq!(
            ctx.expand_iri("ex:other", true, false).as_deref(),
            Some("http://example.org/ns#other")
        );
        assert_eq!(ctx.get_term("knows").unwrap().type_mapping.as_deref(), Some("@id"));
        assert_eq!(ctx.get_term("tags").unwrap().container, Some(ContainerType::Set));
        assert!(ctx.get_term("ex").unwrap().prefix);
    }

    #[tokio::test]
    async fn later_prefix_is_defined_on_demand() {
        let ctx = processed(
            json!({
                "name": "foaf:name",
                "foaf": "http://xmlns.com/foaf/0.1/"
            }),
            &StaticLoader::new(),
        )
        .await;
        assert_eq!(ctx.get_term("name").unwrap().iri, "http://xmlns.com/foaf/0.1/name");
    }

    #[tokio::test]
    async fn relative_document_iris_use_base() {
        let ctx = processed(json!({}), &StaticLoader::new()).await;
        assert_eq!(
            ctx.expand_iri("other.json", false, true).as_deref(),
            Some("http://example.org/other.json")
        );
        assert_eq!(ctx.expand_iri("unmapped", true, false), None);
    }

    #[tokio::test]
    async fn remote_context_resolves_relative_to_referencing_document() {
        let loader = StaticLoader::new().with_document(
            "http://example.org/contexts/main.jsonld",
            json!({"@context": {"title": "http://purl.org/dc/terms/title"}}),
        );
        let ctx = processed(json!("contexts/main.jsonld"), &loader).await;
        assert_eq!(ctx.get_term("title").unwrap().iri, "http://purl.org/dc/terms/title");
    }

    #[tokio::test]
    async fn self_including_context_is_rejected() {
        let loader = StaticLoader::new().with_document(
            "http://example.org/loop.jsonld",
            json!({"@context": "loop.jsonld"}),
        );
        let mut ctx = Context::new(None);
        let err = ctx
            .process(&json!("http://example.org/loop.jsonld"), None, &loader)
            .await
            .unwrap_err();
        assert!(matches!(err, JsonLdError::RecursiveContext(_)));
    }

    #[tokio::test]
    async fn null_resets_the_context() {
        let mut ctx = processed(json!({"@vocab": "http://schema.org/"}), &StaticLoader::new()).await;
        ctx.process(&Value::Null, None, &StaticLoader::new())
            .await
            .unwrap();
        assert!(ctx.vocab.is_none());
        assert_eq!(ctx.base.as_deref(), Some("http://example.org/doc"));
    }
}
