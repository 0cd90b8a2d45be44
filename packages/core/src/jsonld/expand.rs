use futures::future::BoxFuture;
use serde_json::{json, Map, Value};

use super::context::{ContainerType, Context};
use super::{is_absolute_iri, is_blank_node, is_keyword};
use crate::error::JsonLdError;
use crate::loader::DocumentLoader;

/// Expand a JSON-LD document to its expanded form.
///
/// All terms are replaced with absolute IRIs, values are normalised into
/// value objects or node objects, and every property value is an array.
/// The result is always an array.
pub async fn expand_document(
    document: &Value,
    base: Option<&str>,
    loader: &dyn DocumentLoader,
) -> Result<Value, JsonLdError> {
    let context = Context::new(base);
    let expanded = expand_element(&context, None, document, loader).await?;

    // A top-level object with nothing but @graph is just its graph.
    let expanded = match expanded {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("@graph") => {
            map.remove("@graph").unwrap_or(Value::Null)
        }
        other => other,
    };

    Ok(match expanded {
        Value::Array(items) => Value::Array(items),
        Value::Null => json!([]),
        other => json!([other]),
    })
}

/// Expand a single element in the value position of `property`.
fn expand_element<'a>(
    context: &'a Context,
    property: Option<&'a str>,
    element: &'a Value,
    loader: &'a dyn DocumentLoader,
) -> BoxFuture<'a, Result<Value, JsonLdError>> {
    Box::pin(async move {
        match element {
            Value::Null => Ok(Value::Null),
            Value::Array(items) => {
                let mut result = Vec::with_capacity(items.len());
                for item in items {
                    match expand_element(context, property, item, loader).await? {
                        Value::Array(inner) => result.extend(inner),
                        Value::Null => {}
                        expanded => result.push(expanded),
                    }
                }
                Ok(Value::Array(result))
            }
            Value::Object(map) => expand_object(context, property, map, loader).await,
            scalar => {
                // Scalars outside any property are free-floating and dropped.
                match property {
                    None | Some("@graph") => Ok(Value::Null),
                    Some(p) => Ok(expand_value(context, p, scalar)),
                }
            }
        }
    })
}

async fn expand_object(
    parent: &Context,
    property: Option<&str>,
    map: &Map<String, Value>,
    loader: &dyn DocumentLoader,
) -> Result<Value, JsonLdError> {
    let mut context = parent.clone();

    // Property-scoped context from the term this object is the value of.
    if let Some(def) = property.and_then(|p| parent.get_term(p)) {
        if let Some(scoped) = &def.context {
            context = context
                .with_scoped(scoped, def.context_base.as_deref(), loader)
                .await?;
        }
    }

    if let Some(local) = map.get("@context") {
        let base = context.base.clone();
        context.process(local, base.as_deref(), loader).await?;
    }

    // Type-scoped contexts, applied in lexicographic order of the type terms.
    let mut type_terms: Vec<&str> = map
        .iter()
        .filter(|(key, _)| context.expand_iri(key, true, false).as_deref() == Some("@type"))
        .flat_map(|(_, value)| match value {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        })
        .collect();
    type_terms.sort_unstable();
    let type_scope = context.clone();
    for term in type_terms {
        if let Some(scoped) = type_scope.get_term(term).and_then(|d| d.context.clone()) {
            let base = type_scope
                .get_term(term)
                .and_then(|d| d.context_base.clone());
            context = context.with_scoped(&scoped, base.as_deref(), loader).await?;
        }
    }

    let mut result = Map::new();
    // Properties pointing at this node, collected under `@reverse`.
    let mut reverse = Map::new();

    for (key, value) in map {
        if key == "@context" {
            continue;
        }
        let Some(expanded_key) = context.expand_iri(key, true, false) else {
            continue;
        };

        if expanded_key == "@reverse" {
            expand_reverse_keyword(&context, value, &mut result, &mut reverse, loader).await?;
            continue;
        }

        if matches!(expanded_key.as_str(), "@nest" | "@included" | "@direction") {
            return Err(JsonLdError::Unsupported(format!("{expanded_key} in a node object")));
        }

        if is_keyword(&expanded_key) {
            if let Some(expanded) =
                expand_keyword(&context, property, &expanded_key, value, loader).await?
            {
                result.insert(expanded_key, expanded);
            }
            continue;
        }

        if !is_absolute_iri(&expanded_key) && !is_blank_node(&expanded_key) {
            continue;
        }

        let def = context.get_term(key);
        let container = def.and_then(|d| d.container);

        let expanded = match (container, value) {
            (Some(ContainerType::Language), Value::Object(by_language)) => {
                expand_language_map(by_language)
            }
            (Some(ContainerType::Index), Value::Object(by_index)) => {
                expand_index_map(&context, key, by_index, loader).await?
            }
            (Some(ContainerType::Id), Value::Object(by_id)) => {
                expand_id_map(&context, key, by_id, loader).await?
            }
            (Some(ContainerType::Type), Value::Object(by_type)) => {
                expand_type_map(&context, key, by_type, loader).await?
            }
            _ => {
                let expanded = expand_element(&context, Some(key), value, loader).await?;
                match container {
                    Some(ContainerType::List) if !is_list(&expanded) => {
                        json!({ "@list": as_array(expanded) })
                    }
                    Some(ContainerType::Graph) => Value::Array(
                        as_array(expanded)
                            .into_iter()
                            .map(|node| {
                                if is_graph_object(&node) {
                                    node
                                } else {
                                    json!({ "@graph": as_array(node) })
                                }
                            })
                            .collect(),
                    ),
                    _ => expanded,
                }
            }
        };

        if expanded.is_null() {
            continue;
        }
        if def.is_some_and(|d| d.reverse) {
            add_reverse(&mut reverse, &expanded_key, expanded)?;
        } else {
            add_value(&mut result, &expanded_key, expanded);
        }
    }

    if !reverse.is_empty() {
        if result.contains_key("@value") {
            return Err(JsonLdError::InvalidKeywordValue {
                keyword: "@reverse".into(),
                value: Value::Object(reverse).to_string(),
            });
        }
        result.insert("@reverse".into(), Value::Object(reverse));
    }

    finish_object(result, property)
}

/// Expand a `@reverse` entry. Its properties land in `reverse`; a nested
/// `@reverse` inside it points forward again and lands in `result`.
async fn expand_reverse_keyword(
    context: &Context,
    value: &Value,
    result: &mut Map<String, Value>,
    reverse: &mut Map<String, Value>,
    loader: &dyn DocumentLoader,
) -> Result<(), JsonLdError> {
    let invalid = || JsonLdError::InvalidKeywordValue {
        keyword: "@reverse".into(),
        value: value.to_string(),
    };
    if !value.is_object() {
        return Err(invalid());
    }

    let Value::Object(expanded) = expand_element(context, Some("@reverse"), value, loader).await?
    else {
        return Err(invalid());
    };

    for (property, values) in expanded {
        match property.as_str() {
            "@reverse" => {
                if let Value::Object(forward) = values {
                    for (p, v) in forward {
                        add_value(result, &p, v);
                    }
                }
            }
            k if is_keyword(k) => return Err(invalid()),
            _ => add_reverse(reverse, &property, values)?,
        }
    }
    Ok(())
}

/// Add `values` under the reverse property `iri`. Only node objects can be
/// the subject of a reversed edge.
fn add_reverse(reverse: &mut Map<String, Value>, iri: &str, values: Value) -> Result<(), JsonLdError> {
    let values = as_array(values);
    if let Some(bad) = values
        .iter()
        .find(|v| !v.is_object() || v.get("@value").is_some() || v.get("@list").is_some())
    {
        return Err(JsonLdError::InvalidReverseValue {
            property: iri.to_string(),
            value: bad.to_string(),
        });
    }
    add_value(reverse, iri, Value::Array(values));
    Ok(())
}

/// Expand the value of a keyword entry. `None` drops the entry.
async fn expand_keyword(
    context: &Context,
    property: Option<&str>,
    keyword: &str,
    value: &Value,
    loader: &dyn DocumentLoader,
) -> Result<Option<Value>, JsonLdError> {
    let invalid = || JsonLdError::InvalidKeywordValue {
        keyword: keyword.to_string(),
        value: value.to_string(),
    };

    let expanded = match keyword {
        "@id" => {
            let id = value.as_str().ok_or_else(invalid)?;
            context.expand_iri(id, false, true).map(Value::String)
        }
        "@type" => {
            let types = match value {
                Value::String(t) => vec![t.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|t| t.as_str().ok_or_else(invalid))
                    .collect::<Result<_, _>>()?,
                _ => return Err(invalid()),
            };
            Some(Value::Array(
                types
                    .into_iter()
                    .filter_map(|t| context.expand_iri(t, true, true))
                    .map(Value::String)
                    .collect(),
            ))
        }
        "@value" => match value {
            Value::Array(_) | Value::Object(_) => return Err(invalid()),
            scalar => Some(scalar.clone()),
        },
        "@language" => {
            let language = value.as_str().ok_or_else(invalid)?;
            Some(Value::String(language.to_lowercase()))
        }
        "@index" => Some(Value::String(value.as_str().ok_or_else(invalid)?.to_string())),
        "@list" => {
            let items = expand_element(context, property, value, loader).await?;
            Some(as_array(items).into())
        }
        "@set" => Some(expand_element(context, property, value, loader).await?),
        "@graph" => {
            let graph = expand_element(context, Some("@graph"), value, loader).await?;
            Some(as_array(graph).into())
        }
        // Context-only keywords mean nothing on a node.
        _ => None,
    };
    Ok(expanded)
}

/// Expand a native value in the position of `property`, applying the
/// term's type coercion and language.
fn expand_value(context: &Context, property: &str, value: &Value) -> Value {
    let def = context.get_term(property);
    let type_mapping = def.and_then(|d| d.type_mapping.as_deref());

    match (type_mapping, value) {
        (Some("@id"), Value::String(id)) => {
            let iri = context
                .expand_iri(id, false, true)
                .unwrap_or_else(|| id.clone());
            return json!({ "@id": iri });
        }
        (Some("@vocab"), Value::String(id)) => {
            let iri = context
                .expand_iri(id, true, true)
                .unwrap_or_else(|| id.clone());
            return json!({ "@id": iri });
        }
        (Some(datatype), _) if datatype != "@id" && datatype != "@vocab" && datatype != "@none" => {
            return json!({ "@value": value, "@type": datatype });
        }
        _ => {}
    }

    if value.is_string() {
        let language = match def.and_then(|d| d.language.clone()) {
            Some(explicit) => explicit,
            None => context.default_language.clone(),
        };
        if let Some(language) = language {
            return json!({ "@value": value, "@language": language });
        }
    }
    json!({ "@value": value })
}

fn expand_language_map(by_language: &Map<String, Value>) -> Value {
    let mut values = Vec::new();
    for (language, value) in by_language {
        let strings: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            single => vec![single],
        };
        for s in strings.into_iter().filter(|s| s.is_string()) {
            if language == "@none" {
                values.push(json!({ "@value": s }));
            } else {
                values.push(json!({ "@value": s, "@language": language.to_lowercase() }));
            }
        }
    }
    Value::Array(values)
}

async fn expand_index_map(
    context: &Context,
    key: &str,
    by_index: &Map<String, Value>,
    loader: &dyn DocumentLoader,
) -> Result<Value, JsonLdError> {
    let mut values = Vec::new();
    for (index, value) in by_index {
        let expanded = expand_element(context, Some(key), value, loader).await?;
        for mut item in as_array(expanded) {
            if let Value::Object(obj) = &mut item {
                if index != "@none" && !obj.contains_key("@index") {
                    obj.insert("@index".into(), Value::String(index.clone()));
                }
            }
            values.push(item);
        }
    }
    Ok(Value::Array(values))
}

/// Expand an `@id` map: each key becomes the `@id` of the node objects
/// under it, unless they carry their own.
async fn expand_id_map(
    context: &Context,
    key: &str,
    by_id: &Map<String, Value>,
    loader: &dyn DocumentLoader,
) -> Result<Value, JsonLdError> {
    let mut values = Vec::new();
    for (id, value) in by_id {
        let expanded_id = if id == "@none" {
            None
        } else {
            context.expand_iri(id, false, true)
        };
        let expanded = expand_element(context, Some(key), value, loader).await?;
        for mut item in as_array(expanded) {
            let obj = node_in_map(&mut item, "@id", value)?;
            if let Some(id) = &expanded_id {
                obj.entry("@id").or_insert_with(|| Value::String(id.clone()));
            }
            values.push(item);
        }
    }
    Ok(Value::Array(values))
}

/// Expand a `@type` map: each key is prepended to the types of the node
/// objects under it. Bare strings are node references.
async fn expand_type_map(
    context: &Context,
    key: &str,
    by_type: &Map<String, Value>,
    loader: &dyn DocumentLoader,
) -> Result<Value, JsonLdError> {
    let vocab_refs = context
        .get_term(key)
        .and_then(|d| d.type_mapping.as_deref())
        == Some("@vocab");

    let mut values = Vec::new();
    for (type_key, value) in by_type {
        let expanded_type = if type_key == "@none" {
            None
        } else {
            context.expand_iri(type_key, true, true)
        };
        for member in as_slice(value) {
            let expanded = match member {
                Value::String(reference) => context
                    .expand_iri(reference, vocab_refs, true)
                    .map(|iri| json!({ "@id": iri }))
                    .unwrap_or(Value::Null),
                other => expand_element(context, Some(key), other, loader).await?,
            };
            for mut item in as_array(expanded) {
                let obj = node_in_map(&mut item, "@type", value)?;
                if let Some(t) = &expanded_type {
                    let mut types = vec![Value::String(t.clone())];
                    if let Some(existing) = obj.remove("@type") {
                        types.extend(as_array(existing));
                    }
                    obj.insert("@type".into(), Value::Array(types));
                }
                values.push(item);
            }
        }
    }
    Ok(Value::Array(values))
}

/// The node object an `@id` or `@type` map entry expanded to.
fn node_in_map<'a>(
    item: &'a mut Value,
    container: &str,
    source: &Value,
) -> Result<&'a mut Map<String, Value>, JsonLdError> {
    match item {
        Value::Object(obj) if !obj.contains_key("@value") && !obj.contains_key("@list") => Ok(obj),
        _ => Err(JsonLdError::InvalidKeywordValue {
            keyword: format!("{container} map"),
            value: source.to_string(),
        }),
    }
}

/// Normalise a freshly expanded object: value objects, `@set`/`@list`
/// unwrapping, and dropping free-floating nodes outside any property.
fn finish_object(mut result: Map<String, Value>, property: Option<&str>) -> Result<Value, JsonLdError> {
    if result.contains_key("@value") {
        if result.get("@value").is_some_and(Value::is_null) {
            return Ok(Value::Null);
        }
        result.retain(|k, _| matches!(k.as_str(), "@value" | "@type" | "@language" | "@index"));
        // Value objects carry a single datatype.
        if let Some(Value::Array(types)) = result.get("@type") {
            match types.first().cloned() {
                Some(t) => {
                    result.insert("@type".into(), t);
                }
                None => {
                    result.remove("@type");
                }
            }
        }
        return Ok(Value::Object(result));
    }

    if let Some(Value::Array(types)) = result.get("@type") {
        if types.is_empty() {
            result.remove("@type");
        }
    }

    if result.contains_key("@set") {
        return Ok(result.remove("@set").unwrap_or(Value::Null));
    }

    if result.len() == 1 && result.contains_key("@language") {
        return Ok(Value::Null);
    }

    if matches!(property, None | Some("@graph")) {
        let free_floating = result.is_empty()
            || (result.len() == 1
                && (result.contains_key("@list") || result.contains_key("@id")));
        if free_floating {
            return Ok(Value::Null);
        }
    }

    Ok(Value::Object(result))
}

fn add_value(result: &mut Map<String, Value>, key: &str, value: Value) {
    let entry = result
        .entry(key.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if let Value::Array(existing) = entry {
        existing.extend(as_array(value));
    }
}

fn is_list(value: &Value) -> bool {
    value.get("@list").is_some()
}

fn is_graph_object(value: &Value) -> bool {
    value.as_object().is_some_and(|m| {
        m.contains_key("@graph")
            && m.keys().all(|k| matches!(k.as_str(), "@graph" | "@id" | "@index"))
    })
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

fn as_array(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;

    async fn expand(document: Value) -> Value {
        expand_document(&document, Some("http://example.org/base/doc"), &StaticLoader::new())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn terms_and_values_expand() {
        let expanded = expand(json!({
            "@context": {
                "@vocab": "http://schema.org/",
                "knows": {"@type": "@id"},
                "born": {"@id": "http://schema.org/birthDate", "@type": "http://www.w3.org/2001/XMLSchema#date"}
            },
            "@id": "alice",
            "@type": "Person",
            "name": "Alice",
            "knows": "bob",
            "born": "1990-01-01",
            "age": 34
        }))
        .await;

        assert_eq!(
            expanded,
            json!([{
                "@id": "http://example.org/base/alice",
                "@type": ["http://schema.org/Person"],
                "http://schema.org/name": [{"@value": "Alice"}],
                "http://schema.org/knows": [{"@id": "http://example.org/base/bob"}],
                "http://schema.org/birthDate": [{
                    "@value": "1990-01-01",
                    "@type": "http://www.w3.org/2001/XMLSchema#date"
                }],
                "http://schema.org/age": [{"@value": 34}]
            }])
        );
    }

    #[tokio::test]
    async fn unmapped_keys_are_dropped() {
        let expanded = expand(json!({
            "@context": {"name": "http://schema.org/name"},
            "name": "kept",
            "stray": "dropped",
            "_error": "dropped too"
        }))
        .await;
        assert_eq!(expanded, json!([{"http://schema.org/name": [{"@value": "kept"}]}]));
    }

    #[tokio::test]
    async fn already_expanded_input_is_stable() {
        let input = json!([{
            "@id": "http://example.org/a",
            "http://schema.org/knows": {"@id": "http://example.org/b"},
            "http://schema.org/name": {"@value": "A"}
        }]);
        let expanded = expand(input).await;
        assert_eq!(
            expanded,
            json!([{
                "@id": "http://example.org/a",
                "http://schema.org/knows": [{"@id": "http://example.org/b"}],
                "http://schema.org/name": [{"@value": "A"}]
            }])
        );
        assert_eq!(expand(expanded.clone()).await, expanded);
    }

    #[tokio::test]
    async fn lists_sets_and_language() {
        let expanded = expand(json!({
            "@context": {
                "@language": "en",
                "ex": "http://example.org/ns#",
                "steps": {"@id": "ex:steps", "@container": "@list"},
                "tags": {"@id": "ex:tags", "@container": "@set"},
                "code": {"@id": "ex:code", "@language": null}
            },
            "@id": "http://example.org/recipe",
            "steps": ["mix", "bake"],
            "tags": "easy",
            "code": "R-1",
            "ex:title": {"@value": "Bread", "@language": "FR"}
        }))
        .await;

        assert_eq!(
            expanded,
            json!([{
                "@id": "http://example.org/recipe",
                "http://example.org/ns#steps": [{"@list": [
                    {"@value": "mix", "@language": "en"},
                    {"@value": "bake", "@language": "en"}
                ]}],
                "http://example.org/ns#tags": [{"@value": "easy", "@language": "en"}],
                "http://example.org/ns#code": [{"@value": "R-1"}],
                "http://example.org/ns#title": [{"@value": "Bread", "@language": "fr"}]
            }])
        );
    }

    #[tokio::test]
    async fn graph_and_free_floating_nodes() {
        let expanded = expand(json!({
            "@context": {"@vocab": "http://schema.org/"},
            "@graph": [
                {"@id": "http://example.org/1", "name": "one"},
                {"@id": "http://example.org/only-id"},
                "free-floating string"
            ]
        }))
        .await;
        assert_eq!(
            expanded,
            json!([{"@id": "http://example.org/1", "http://schema.org/name": [{"@value": "one"}]}])
        );

        assert_eq!(expand(json!({"@id": "http://example.org/x"})).await, json!([]));
        assert_eq!(expand(json!("just a string")).await, json!([]));
    }

    #[tokio::test]
    async fn scoped_contexts_apply_to_nested_objects() {
        let expanded = expand(json!({
            "@context": {
                "@vocab": "http://schema.org/",
                "address": {"@context": {"@vocab": "http://example.org/addr#"}},
                "Book": {"@id": "http://schema.org/Book", "@context": {"title": "http://purl.org/dc/terms/title"}}
            },
            "@type": "Book",
            "title": "Dune",
            "address": {"street": "Main"}
        }))
        .await;
        assert_eq!(
            expanded,
            json!([{
                "@type": ["http://schema.org/Book"],
                "http://purl.org/dc/terms/title": [{"@value": "Dune"}],
                "http://schema.org/address": [{"http://example.org/addr#street": [{"@value": "Main"}]}]
            }])
        );
    }

    #[tokio::test]
    async fn remote_context_is_loaded() {
        let loader = StaticLoader::new().with_document(
            "http://example.org/base/context.jsonld",
            json!({"@context": {"label": "http://www.w3.org/2000/01/rdf-schema#label"}}),
        );
        let expanded = expand_document(
            &json!({"@context": "context.jsonld", "label": "x"}),
            Some("http://example.org/base/doc"),
            &loader,
        )
        .await
        .unwrap();
        assert_eq!(
            expanded,
            json!([{"http://www.w3.org/2000/01/rdf-schema#label": [{"@value": "x"}]}])
        );
    }

    #[tokio::test]
    async fn missing_remote_context_fails() {
        let err = expand_document(
            &json!({"@context": "http://example.org/nowhere", "a": 1}),
            None,
            &StaticLoader::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, JsonLdError::Loading(_)));
    }

    #[tokio::test]
    async fn reverse_keyword_nests_and_flips_back() {
        let expanded = expand(json!({
            "@context": {"@vocab": "http://schema.org/"},
            "@id": "http://example.org/kid",
            "@reverse": {
                "parent": {"@id": "http://example.org/mum"},
                "@reverse": {"knows": {"@id": "http://example.org/friend"}}
            }
        }))
        .await;
        assert_eq!(
            expanded,
            json!([{
                "@id": "http://example.org/kid",
                "@reverse": {"http://schema.org/parent": [{"@id": "http://example.org/mum"}]},
                "http://schema.org/knows": [{"@id": "http://example.org/friend"}]
            }])
        );
    }

    #[tokio::test]
    async fn type_maps_add_their_key_as_a_type() {
        let expanded = expand(json!({
            "@context": {
                "@vocab": "http://schema.org/",
                "byType": {"@id": "http://schema.org/member", "@container": "@type"}
            },
            "@id": "http://example.org/org",
            "byType": {
                "Person": "http://example.org/alice",
                "Organization": {"@id": "http://example.org/acme", "name": "Acme"}
            }
        }))
        .await;
        assert_eq!(
            expanded[0]["http://schema.org/member"],
            json!([
                {"@id": "http://example.org/alice", "@type": ["http://schema.org/Person"]},
                {
                    "@id": "http://example.org/acme",
                    "@type": ["http://schema.org/Organization"],
                    "http://schema.org/name": [{"@value": "Acme"}]
                }
            ])
        );
    }

    #[tokio::test]
    async fn literal_under_reverse_property_is_rejected() {
        let err = expand_document(
            &json!({
                "@context": {"children": {"@reverse": "http://schema.org/parent"}},
                "@id": "http://example.org/p",
                "children": "not a node"
            }),
            None,
            &StaticLoader::new(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, JsonLdError::InvalidReverseValue { .. }));
    }

    #[tokio::test]
    async fn unimplemented_constructs_fail_loudly() {
        let documents = [
            json!({
                "@context": {"@vocab": "http://schema.org/"},
                "@nest": {"name": "hidden"}
            }),
            json!({
                "@context": {"data": {"@id": "http://example.org/data", "@type": "@json"}},
                "data": {"raw": true}
            }),
            json!({
                "@context": {
                    "graphs": {"@id": "http://example.org/g", "@container": ["@graph", "@id"]}
                },
                "graphs": {}
            }),
            json!({"@context": {"@direction": "rtl"}, "http://schema.org/name": "x"}),
        ];
        for document in documents {
            let err = expand_document(&document, None, &StaticLoader::new())
                .await
                .unwrap_err();
            assert!(matches!(err, JsonLdError::Unsupported(_)), "{document}: {err}");
        }
    }

    #[tokio::test]
    async fn invalid_id_is_rejected() {
        let err = expand_document(&json!({"@id": 5}), None, &StaticLoader::new())
            .await
            .unwrap_err();
        assert!(matches!(err, JsonLdError::InvalidKeywordValue { .. }));
    }
}
