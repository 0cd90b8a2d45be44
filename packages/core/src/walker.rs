//! Traversal of expanded JSON-LD trees.
//!
//! Every node is classified once into a [`Shape`] and handled by exactly one
//! branch. Reference nodes (`{"@id": "<http|https|file URL>"}` with no other
//! keys) are offered to a [`ReferenceExpander`]; everything else is rebuilt
//! structurally. [`references`] and [`walk`] visit references in the same
//! document order: sequence items in turn, mapping values in key order.

use serde_json::{Map, Value};

/// URL schemes that make an `@id`-only node inlineable.
pub const REFERENCE_SCHEMES: &[&str] = &["http://", "https://", "file://"];

/// The four node shapes the walker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape<'a> {
    Sequence(&'a [Value]),
    /// An `@id`-only node pointing at a fetchable document.
    Reference(&'a str),
    Mapping(&'a Map<String, Value>),
    /// Strings, numbers, booleans, null.
    Scalar(&'a Value),
}

impl<'a> Shape<'a> {
    pub fn classify(node: &'a Value) -> Self {
        match node {
            Value::Array(items) => Shape::Sequence(items),
            Value::Object(map) => match reference_target(map) {
                Some(url) => Shape::Reference(url),
                None => Shape::Mapping(map),
            },
            scalar => Shape::Scalar(scalar),
        }
    }
}

fn reference_target(map: &Map<String, Value>) -> Option<&str> {
    if map.len() != 1 {
        return None;
    }
    let url = map.get("@id")?.as_str()?;
    REFERENCE_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
        .then_some(url)
}

/// Supplies the content that replaces a reference node.
pub trait ReferenceExpander {
    /// `None` leaves the reference to `url` as it is.
    fn expand_reference(&mut self, url: &str) -> Option<Value>;
}

/// Targets of every reference node under `node`, in document order.
/// Repeated targets are listed once per occurrence.
pub fn references(node: &Value) -> Vec<&str> {
    let mut found = Vec::new();
    collect_references(node, &mut found);
    found
}

fn collect_references<'a>(node: &'a Value, found: &mut Vec<&'a str>) {
    match Shape::classify(node) {
        Shape::Sequence(items) => {
            for item in items {
                collect_references(item, found);
            }
        }
        Shape::Reference(url) => found.push(url),
        Shape::Mapping(map) => {
            for value in map.values() {
                collect_references(value, found);
            }
        }
        Shape::Scalar(_) => {}
    }
}

/// Rebuild `node`, asking `expander` for each reference in the order
/// [`references`] lists them. Single-element sequences collapse to their
/// element.
pub fn walk<E>(expander: &mut E, node: &Value) -> Value
where
    E: ReferenceExpander + ?Sized,
{
    match Shape::classify(node) {
        Shape::Sequence(items) => {
            let mut walked = Vec::with_capacity(items.len());
            for item in items {
                walked.push(walk(&mut *expander, item));
            }
            if walked.len() == 1 {
                walked.pop().unwrap_or(Value::Null)
            } else {
                Value::Array(walked)
            }
        }
        Shape::Reference(url) => expander
            .expand_reference(url)
            .unwrap_or_else(|| node.clone()),
        Shape::Mapping(map) => {
            let mut walked = Map::with_capacity(map.len());
            for (key, value) in map {
                walked.insert(key.clone(), walk(&mut *expander, value));
            }
            Value::Object(walked)
        }
        Shape::Scalar(_) => node.clone(),
    }
}
