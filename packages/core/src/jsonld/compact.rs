use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::context::{ContainerType, Context, TermDefinition};
use super::is_keyword;

/// Compact an expanded document against an already processed context.
///
/// `context_value` is attached verbatim as the result's `@context`. Several
/// top-level nodes are wrapped in `@graph`; a single node is returned bare.
pub fn compact_document(expanded: &Value, context: &Context, context_value: &Value) -> Value {
    let compacted = compact_element(context, None, expanded);

    let mut body = match compacted {
        Value::Array(items) if items.is_empty() => Map::new(),
        Value::Array(mut items) if items.len() == 1 && items[0].is_object() => {
            match items.pop() {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            }
        }
        Value::Array(items) => {
            let mut map = Map::new();
            map.insert(keyword_alias(context, "@graph"), Value::Array(items));
            map
        }
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if !is_empty_context(context_value) {
        let mut with_context = Map::new();
        with_context.insert("@context".into(), context_value.clone());
        with_context.append(&mut body);
        body = with_context;
    }
    Value::Object(body)
}

fn is_empty_context(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn compact_element(context: &Context, property: Option<&str>, element: &Value) -> Value {
    match element {
        Value::Array(items) => {
            let compacted: Vec<Value> = items
                .iter()
                .map(|item| compact_element(context, property, item))
                .filter(|item| !item.is_null())
                .collect();
            let keep_array = property.is_none()
                || matches!(
                    container_of(context, property),
                    Some(ContainerType::Set | ContainerType::List)
                );
            if compacted.len() == 1 && !keep_array {
                compacted.into_iter().next().unwrap_or(Value::Null)
            } else {
                Value::Array(compacted)
            }
        }
        Value::Object(map) => compact_object(context, property, map),
        scalar => scalar.clone(),
    }
}

/// Property values grouped under the term chosen for them, each kept next
/// to its expanded form so map containers can read their keys from it.
type Grouped<'a> = IndexMap<String, Vec<(&'a Value, Value)>>;

fn compact_object(context: &Context, property: Option<&str>, map: &Map<String, Value>) -> Value {
    let definition = property.and_then(|p| context.get_term(p));
    // Entries of @id and @type maps stay node objects; the map supplies the key.
    let in_keyed_map = matches!(
        definition.and_then(|d| d.container),
        Some(ContainerType::Id | ContainerType::Type)
    );

    if !in_keyed_map && (map.contains_key("@value") || is_node_reference(map)) {
        if let Some(simple) = compact_value(context, definition, map) {
            return simple;
        }
    }

    if let Some(list) = map.get("@list") {
        let items = match list {
            Value::Array(items) => items
                .iter()
                .map(|item| compact_element(context, property, item))
                .collect(),
            other => vec![compact_element(context, property, other)],
        };
        if definition.and_then(|d| d.container) == Some(ContainerType::List) {
            return Value::Array(items);
        }
        let mut result = Map::new();
        result.insert(keyword_alias(context, "@list"), Value::Array(items));
        if let Some(index) = map.get("@index") {
            result.insert(keyword_alias(context, "@index"), index.clone());
        }
        return Value::Object(result);
    }

    let mut result = Map::new();
    let mut properties = Grouped::new();
    // Reverse properties no reverse term covers stay under @reverse.
    let mut reversed = Grouped::new();

    for (key, value) in map {
        match key.as_str() {
            "@id" => {
                if let Some(id) = value.as_str() {
                    result.insert(
                        keyword_alias(context, "@id"),
                        Value::String(compact_iri(context, id, false)),
                    );
                }
            }
            "@type" => {
                let types: Vec<Value> = as_slice(value)
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|t| Value::String(compact_iri(context, t, true)))
                    .collect();
                let types = if types.len() == 1 {
                    types.into_iter().next().unwrap_or(Value::Null)
                } else {
                    Value::Array(types)
                };
                result.insert(keyword_alias(context, "@type"), types);
            }
            "@graph" => {
                let graph = compact_element(context, Some("@graph"), value);
                result.insert(keyword_alias(context, "@graph"), graph);
            }
            "@reverse" => {
                let Value::Object(by_property) = value else {
                    continue;
                };
                for (iri, values) in by_property {
                    for item in as_slice(values) {
                        let (term, target) = match best_term(context, iri, item, true) {
                            Some(term) => (term, &mut properties),
                            None => (select_term(context, iri, item), &mut reversed),
                        };
                        let compacted = compact_element(context, Some(&term), item);
                        target.entry(term).or_default().push((item, compacted));
                    }
                }
            }
            k if is_keyword(k) => {
                result.insert(keyword_alias(context, k), value.clone());
            }
            iri => {
                for item in as_slice(value) {
                    let term = select_term(context, iri, item);
                    let compacted = compact_element(context, Some(&term), item);
                    properties.entry(term).or_default().push((item, compacted));
                }
            }
        }
    }

    place_values(context, properties, &mut result);
    if !reversed.is_empty() {
        let mut reverse_map = Map::new();
        place_values(context, reversed, &mut reverse_map);
        result.insert(keyword_alias(context, "@reverse"), Value::Object(reverse_map));
    }

    Value::Object(result)
}

/// Write each term's values into `result` in the shape its container asks
/// for.
fn place_values(context: &Context, properties: Grouped<'_>, result: &mut Map<String, Value>) {
    for (term, entries) in properties {
        let container = container_of(context, Some(&term));
        let value = match container {
            Some(ContainerType::Id) => keyed(
                entries
                    .into_iter()
                    .map(|(raw, compacted)| id_entry(context, raw, compacted)),
            ),
            Some(ContainerType::Type) => keyed(
                entries
                    .into_iter()
                    .map(|(raw, compacted)| type_entry(context, raw, compacted)),
            ),
            Some(ContainerType::Language) => keyed(entries.into_iter().map(|(raw, _)| {
                let language = raw
                    .get("@language")
                    .and_then(Value::as_str)
                    .map_or_else(|| keyword_alias(context, "@none"), str::to_string);
                (language, raw.get("@value").cloned().unwrap_or(Value::Null))
            })),
            _ => {
                let mut values: Vec<Value> = entries.into_iter().map(|(_, c)| c).collect();
                match container {
                    Some(ContainerType::List) if values.len() == 1 => {
                        values.pop().unwrap_or(Value::Null)
                    }
                    Some(ContainerType::Set | ContainerType::List) => Value::Array(values),
                    _ if values.len() == 1 => values.pop().unwrap_or(Value::Null),
                    _ => Value::Array(values),
                }
            }
        };
        result.insert(term, value);
    }
}

/// Collect `(key, value)` pairs into a map, turning repeated keys into
/// arrays.
fn keyed(entries: impl Iterator<Item = (String, Value)>) -> Value {
    let mut map = Map::new();
    for (key, value) in entries {
        match map.get_mut(&key) {
            Some(Value::Array(existing)) => existing.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                map.insert(key, value);
            }
        }
    }
    Value::Object(map)
}

/// An `@id` map entry: the node's compacted `@id` as key, the rest of the
/// node as value.
fn id_entry(context: &Context, raw: &Value, mut compacted: Value) -> (String, Value) {
    let key = raw
        .get("@id")
        .and_then(Value::as_str)
        .map_or_else(|| keyword_alias(context, "@none"), |id| compact_iri(context, id, false));
    if let Value::Object(node) = &mut compacted {
        node.remove(&keyword_alias(context, "@id"));
    }
    (key, compacted)
}

/// A `@type` map entry: the node's first type as key, its remaining types
/// left on the node.
fn type_entry(context: &Context, raw: &Value, mut compacted: Value) -> (String, Value) {
    let types: Vec<&str> = raw
        .get("@type")
        .map(as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_str)
        .collect();
    let key = types
        .first()
        .map_or_else(|| keyword_alias(context, "@none"), |t| compact_iri(context, t, true));

    if let Value::Object(node) = &mut compacted {
        let alias = keyword_alias(context, "@type");
        node.remove(&alias);
        let mut rest: Vec<Value> = types
            .iter()
            .skip(1)
            .map(|t| Value::String(compact_iri(context, t, true)))
            .collect();
        match rest.len() {
            0 => {}
            1 => {
                node.insert(alias, rest.remove(0));
            }
            _ => {
                node.insert(alias, Value::Array(rest));
            }
        }
    }
    (key, compacted)
}

/// Reduce a value object or node reference to a bare literal or string when
/// the term's coercion makes that lossless. `None` keeps the object form.
fn compact_value(
    context: &Context,
    definition: Option<&TermDefinition>,
    map: &Map<String, Value>,
) -> Option<Value> {
    let type_mapping = definition.and_then(|d| d.type_mapping.as_deref());

    if is_node_reference(map) {
        let id = map.get("@id")?.as_str()?;
        return Some(match type_mapping {
            Some("@id") => Value::String(compact_iri(context, id, false)),
            Some("@vocab") => Value::String(compact_iri(context, id, true)),
            _ => {
                let mut reference = Map::new();
                reference.insert(
                    keyword_alias(context, "@id"),
                    Value::String(compact_iri(context, id, false)),
                );
                Value::Object(reference)
            }
        });
    }

    let value = map.get("@value")?;
    if map.contains_key("@index") {
        return None;
    }

    let datatype = map.get("@type").and_then(Value::as_str);
    let language = map.get("@language").and_then(Value::as_str);
    let term_language = definition.and_then(|d| d.language.clone());

    let literal = match (datatype, language) {
        (Some(t), _) => type_mapping == Some(t),
        (None, Some(l)) => {
            type_mapping.is_none()
                && match &term_language {
                    Some(explicit) => explicit.as_deref() == Some(l),
                    None => context.default_language.as_deref() == Some(l),
                }
        }
        (None, None) => {
            let plain_coercion = matches!(type_mapping, None | Some("@id" | "@vocab"));
            // A plain string under a default language would pick one up.
            let gains_language = value.is_string()
                && match &term_language {
                    Some(explicit) => explicit.is_some(),
                    None => context.default_language.is_some(),
                };
            plain_coercion && !gains_language
        }
    };
    if literal {
        return Some(value.clone());
    }

    let mut object = Map::new();
    object.insert(keyword_alias(context, "@value"), value.clone());
    if let Some(t) = datatype {
        object.insert(
            keyword_alias(context, "@type"),
            Value::String(compact_iri(context, t, true)),
        );
    }
    if let Some(l) = language {
        object.insert(keyword_alias(context, "@language"), Value::String(l.into()));
    }
    Some(Value::Object(object))
}

/// Pick the key for `item` under the forward property `iri`: the
/// best-matching term, falling back to a compacted IRI.
fn select_term(context: &Context, iri: &str, item: &Value) -> String {
    best_term(context, iri, item, false).unwrap_or_else(|| compact_iri(context, iri, true))
}

/// The best term for `item` among the terms mapping to `iri` in the given
/// direction.
fn best_term(context: &Context, iri: &str, item: &Value, reverse: bool) -> Option<String> {
    context
        .terms
        .iter()
        .filter(|(_, def)| def.iri == iri && def.reverse == reverse)
        .filter_map(|(term, def)| term_score(def, item).map(|score| (score, term)))
        .max_by(|(a_score, a), (b_score, b)| {
            a_score
                .cmp(b_score)
                .then_with(|| b.len().cmp(&a.len()))
                .then_with(|| b.cmp(a))
        })
        .map(|(_, term)| term.clone())
}

/// How well `def` fits `item`; `None` when the term cannot hold it.
fn term_score(def: &TermDefinition, item: &Value) -> Option<u8> {
    let map = item.as_object();
    let is_list = map.is_some_and(|m| m.contains_key("@list"));
    let is_value = map.is_some_and(|m| m.contains_key("@value"));
    let container = def.container;

    match container {
        // Index maps and graph containers are never produced here.
        Some(ContainerType::Index | ContainerType::Graph) => return None,
        Some(ContainerType::Language) => {
            let m = map?;
            let plain_language = m.get("@value").is_some_and(Value::is_string)
                && m.get("@language").is_some_and(Value::is_string)
                && !m.contains_key("@type")
                && !m.contains_key("@index");
            return plain_language.then_some(3);
        }
        Some(ContainerType::Id) => {
            let m = map?;
            return (!is_list && !is_value && m.contains_key("@id")).then_some(3);
        }
        Some(ContainerType::Type) => {
            let m = map?;
            let typed = m
                .get("@type")
                .is_some_and(|t| !as_slice(t).is_empty());
            return (!is_list && !is_value && typed).then_some(3);
        }
        _ => {}
    }

    if is_list {
        return match container {
            Some(ContainerType::List) => Some(3),
            None => Some(1),
            _ => None,
        };
    }
    if container == Some(ContainerType::List) {
        return None;
    }

    let type_mapping = def.type_mapping.as_deref();
    let Some(map) = map else {
        return Some(1);
    };

    if is_node_reference(map) {
        return match type_mapping {
            Some("@id" | "@vocab") => Some(2),
            None => Some(1),
            Some(_) => None,
        };
    }

    if !map.contains_key("@value") {
        // Full node object.
        return match type_mapping {
            None | Some("@id" | "@vocab") => Some(1),
            Some(_) => None,
        };
    }

    let datatype = map.get("@type").and_then(Value::as_str);
    let language = map.get("@language").and_then(Value::as_str);
    match (datatype, language) {
        (Some(t), _) => match type_mapping {
            Some(m) if m == t => Some(2),
            None => Some(1),
            Some(_) => None,
        },
        (None, Some(l)) => match (&def.language, type_mapping) {
            (Some(Some(term_lang)), None) if term_lang == l => Some(2),
            (Some(Some(_)), _) => None,
            (_, None) => Some(1),
            _ => None,
        },
        (None, None) => match (&def.language, type_mapping) {
            (Some(None), None) => Some(2),
            (Some(Some(_)), _) => None,
            (_, None) => Some(1),
            _ => None,
        },
    }
}

/// Compact an absolute IRI (or keyword) to the shortest form the context
/// can still expand back to it.
pub fn compact_iri(context: &Context, iri: &str, vocab: bool) -> String {
    if is_keyword(iri) {
        return keyword_alias(context, iri);
    }

    if vocab {
        if let Some(term) = shortest_term(context, |def| {
            def.iri == iri && def.container.is_none() && !def.reverse
        }) {
            return term;
        }

        if let Some(suffix) = context
            .vocab
            .as_deref()
            .and_then(|v| iri.strip_prefix(v))
            .filter(|s| !s.is_empty() && !context.terms.contains_key(*s))
        {
            return suffix.to_string();
        }
    }

    let compact = context
        .terms
        .iter()
        .filter(|(_, def)| def.prefix && !def.reverse && !def.iri.is_empty() && iri != def.iri)
        .filter_map(|(term, def)| {
            let suffix = iri.strip_prefix(def.iri.as_str())?;
            let candidate = format!("{term}:{suffix}");
            // The compact IRI must not collide with a different term.
            match context.terms.get(&candidate) {
                Some(other) if other.iri != iri => None,
                _ => Some(candidate),
            }
        })
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    compact.unwrap_or_else(|| iri.to_string())
}

/// The shortest (then lexicographically least) term used as an alias for
/// `keyword`, or the keyword itself.
fn keyword_alias(context: &Context, keyword: &str) -> String {
    shortest_term(context, |def| def.iri == keyword).unwrap_or_else(|| keyword.to_string())
}

fn shortest_term(context: &Context, accept: impl Fn(&TermDefinition) -> bool) -> Option<String> {
    context
        .terms
        .iter()
        .filter(|(_, def)| accept(def))
        .map(|(term, _)| term)
        .min_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)))
        .cloned()
}

fn container_of(context: &Context, property: Option<&str>) -> Option<ContainerType> {
    property
        .and_then(|p| context.get_term(p))
        .and_then(|d| d.container)
}

fn is_node_reference(map: &Map<String, Value>) -> bool {
    map.len() == 1 && map.get("@id").is_some_and(Value::is_string)
}

fn as_slice(value: &Value) -> &[Value] {
    match value {
        Value::Array(items) => items,
        single => std::slice::from_ref(single),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;
    use serde_json::json;

    async fn context(value: Value) -> Context {
        let mut ctx = Context::new(None);
        ctx.process(&value, None, &StaticLoader::new()).await.unwrap();
        ctx
    }

    #[tokio::test]
    async fn terms_vocab_and_prefixes() {
        let ctx_value = json!({
            "@vocab": "http://schema.org/",
            "ex": "http://example.org/ns#",
            "knows": {"@id": "http://schema.org/knows", "@type": "@id"}
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "@id": "http://example.org/ns#alice",
            "@type": ["http://schema.org/Person"],
            "http://schema.org/name": [{"@value": "Alice"}],
            "http://schema.org/knows": [{"@id": "http://example.org/ns#bob"}],
            "http://example.org/ns#score": [{"@value": 7}]
        }]);

        assert_eq!(
            compact_document(&expanded, &ctx, &ctx_value),
            json!({
                "@context": ctx_value,
                "@id": "ex:alice",
                "@type": "Person",
                "name": "Alice",
                "knows": "ex:bob",
                "ex:score": 7
            })
        );
    }

    #[tokio::test]
    async fn sets_keep_arrays_and_singletons_collapse() {
        let ctx_value = json!({
            "ex": "http://example.org/",
            "tags": {"@id": "http://example.org/tag", "@container": "@set"},
            "label": "http://example.org/label"
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "http://example.org/tag": [{"@value": "one"}],
            "http://example.org/label": [{"@value": "a"}, {"@value": "b"}]
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["tags"], json!(["one"]));
        assert_eq!(compacted["label"], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn typed_and_language_values() {
        let ctx_value = json!({
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "born": {"@id": "http://schema.org/birthDate", "@type": "xsd:date"},
            "name": "http://schema.org/name"
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "http://schema.org/birthDate": [{"@value": "1990-01-01", "@type": "http://www.w3.org/2001/XMLSchema#date"}],
            "http://schema.org/name": [{"@value": "Alicia", "@language": "es"}]
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["born"], json!("1990-01-01"));
        assert_eq!(compacted["name"], json!({"@value": "Alicia", "@language": "es"}));
    }

    #[tokio::test]
    async fn lists_and_graph_wrapping() {
        let ctx_value = json!({
            "steps": {"@id": "http://example.org/steps", "@container": "@list"},
            "name": "http://schema.org/name"
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([
            {"@id": "http://example.org/a", "http://example.org/steps": [{"@list": [{"@value": "x"}, {"@value": "y"}]}]},
            {"@id": "http://example.org/b", "http://schema.org/name": [{"@value": "B"}]}
        ]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(
            compacted["@graph"],
            json!([
                {"@id": "http://example.org/a", "steps": ["x", "y"]},
                {"@id": "http://example.org/b", "name": "B"}
            ])
        );
    }

    #[tokio::test]
    async fn keyword_aliases_are_used() {
        let ctx_value = json!({"id": "@id", "type": "@type", "@vocab": "http://schema.org/"});
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "@id": "http://example.org/x",
            "@type": ["http://schema.org/Thing"],
            "http://schema.org/about": [{"@id": "http://example.org/y"}]
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["id"], "http://example.org/x");
        assert_eq!(compacted["type"], "Thing");
        assert_eq!(compacted["about"], json!({"id": "http://example.org/y"}));
    }

    #[tokio::test]
    async fn reverse_terms_and_id_maps() {
        let ctx_value = json!({
            "@vocab": "http://schema.org/",
            "children": {"@reverse": "http://schema.org/parent"},
            "byId": {"@id": "http://schema.org/member", "@container": "@id"}
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "@id": "http://e/p",
            "@reverse": {"http://schema.org/parent": [{"@id": "http://e/kid"}]},
            "http://schema.org/member": [
                {"@id": "http://e/m1", "http://schema.org/name": [{"@value": "M1"}]},
                {"@id": "http://e/m2"}
            ]
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["children"], json!({"@id": "http://e/kid"}));
        assert_eq!(
            compacted["byId"],
            json!({"http://e/m1": {"name": "M1"}, "http://e/m2": {}})
        );
        assert!(compacted.get("@reverse").is_none());
    }

    #[tokio::test]
    async fn uncovered_reverse_properties_stay_under_reverse() {
        let ctx_value = json!({"@vocab": "http://schema.org/"});
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "@id": "http://e/p",
            "@reverse": {"http://schema.org/parent": [{"@id": "http://e/kid"}]}
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["@reverse"], json!({"parent": {"@id": "http://e/kid"}}));
    }

    #[tokio::test]
    async fn type_and_language_maps() {
        let ctx_value = json!({
            "@vocab": "http://schema.org/",
            "byType": {"@id": "http://schema.org/member", "@container": "@type"},
            "label": {"@id": "http://schema.org/name", "@container": "@language"}
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{
            "http://schema.org/member": [
                {"@id": "http://e/acme", "@type": ["http://schema.org/Organization"]}
            ],
            "http://schema.org/name": [
                {"@value": "Hello", "@language": "en"},
                {"@value": "Hallo", "@language": "de"}
            ]
        }]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert_eq!(compacted["byType"], json!({"Organization": {"@id": "http://e/acme"}}));
        assert_eq!(compacted["label"], json!({"en": "Hello", "de": "Hallo"}));
    }

    #[tokio::test]
    async fn index_containers_are_not_chosen() {
        let ctx_value = json!({
            "byIndex": {"@id": "http://schema.org/name", "@container": "@index"}
        });
        let ctx = context(ctx_value.clone()).await;
        let expanded = json!([{"http://schema.org/name": [{"@value": "Alice"}]}]);
        let compacted = compact_document(&expanded, &ctx, &ctx_value);
        assert!(compacted.get("byIndex").is_none());
        assert_eq!(compacted["http://schema.org/name"], json!("Alice"));
    }

    #[test]
    fn empty_input_keeps_only_context() {
        let compacted = compact_document(&json!([]), &Context::default(), &json!("http://example.org/ctx"));
        assert_eq!(compacted, json!({"@context": "http://example.org/ctx"}));
    }
}
