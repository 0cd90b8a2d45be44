//! URL rewriting through an ordered table of literal and wildcard rules.
//!
//! A [`MappingTable`] is the administrator-facing data: a flat JSON object
//! of `pattern → replacement`. The [`UrlMapper`] holds the live table for the
//! whole process and applies it to every URL the resolver is asked to load.
//!
//! # Rules
//!
//! - A pattern without `*` matches the input string exactly.
//! - A pattern with `*` matches the whole input, each `*` capturing any run
//!   of characters. The replacement may refer to the first capture as
//!   `${rest}` and to any capture as `$0`, `$1`, ... (`$0` is the whole
//!   input).
//! - Exact matches win over wildcards; wildcards are tried in table order.
//!
//! Mapping is chained: the output of one pass is fed back in until it stops
//! changing or the pass limit is reached.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MappingError;

/// Default cap on chained mapping passes.
pub const DEFAULT_MAX_MAPPING_DEPTH: usize = 10;

/// The wildcard marker inside a pattern.
pub const WILDCARD: char = '*';

/// Template placeholder replaced by the first wildcard capture.
const REST_PLACEHOLDER: &str = "${rest}";

// ---------------------------------------------------------------------------
// MappingTable
// ---------------------------------------------------------------------------

/// Ordered `pattern → replacement` rules, serialised as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingTable(IndexMap<String, String>);

impl MappingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a mapping file (a flat JSON object of strings).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MappingError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| MappingError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| MappingError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Append a rule, builder style. Re-inserting a pattern keeps its
    /// original position and overwrites the replacement.
    pub fn with(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.0.insert(pattern.into(), replacement.into());
        self
    }

    pub fn get(&self, pattern: &str) -> Option<&str> {
        self.0.get(pattern).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rules in definition order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MappingTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Compiled rules
// ---------------------------------------------------------------------------

struct WildcardRule {
    matcher: Regex,
    template: String,
}

/// A table plus its wildcard patterns compiled to anchored regexes.
struct CompiledTable {
    table: MappingTable,
    wildcards: Vec<WildcardRule>,
}

impl CompiledTable {
    fn compile(table: MappingTable) -> Self {
        let wildcards = table
            .iter()
            .filter(|(pattern, _)| pattern.contains(WILDCARD))
            .filter_map(|(pattern, template)| match wildcard_regex(pattern) {
                Ok(matcher) => Some(WildcardRule {
                    matcher,
                    template: template.to_string(),
                }),
                Err(e) => {
                    warn!("mapping: skipping unusable pattern {pattern}: {e}");
                    None
                }
            })
            .collect();
        Self { table, wildcards }
    }

    fn apply_once(&self, url: &str) -> String {
        if let Some(replacement) = self.table.get(url).filter(|r| !r.is_empty()) {
            return replacement.to_string();
        }
        for rule in &self.wildcards {
            if let Some(caps) = rule.matcher.captures(url) {
                return fill_template(&rule.template, &caps);
            }
        }
        url.to_string()
    }
}

/// Translate `http://example.org/*` into `^http://example\.org/(.*)$`.
fn wildcard_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let literal_parts: Vec<String> = pattern.split(WILDCARD).map(regex::escape).collect();
    Regex::new(&format!("^{}$", literal_parts.join("(.*)")))
}

fn fill_template(template: &str, caps: &Captures<'_>) -> String {
    let rest = caps.get(1).map_or("", |m| m.as_str());
    let mut out = template.replace(REST_PLACEHOLDER, rest);
    // Highest index first so `$1` never eats the prefix of `$10`.
    for i in (0..caps.len()).rev() {
        let group = caps.get(i).map_or("", |m| m.as_str());
        out = out.replace(&format!("${i}"), group);
    }
    out
}

// ---------------------------------------------------------------------------
// UrlMapper
// ---------------------------------------------------------------------------

/// Outcome of a chained mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedUrl {
    pub url: String,
    /// Number of passes that changed the URL.
    pub passes: usize,
    /// `true` when the pass limit stopped the chain.
    pub depth_exceeded: bool,
}

/// The process-wide mapping table and the chained rewrite over it.
///
/// Replacement is wholesale; a concurrent [`UrlMapper::map`] sees either the
/// old or the new table for the duration of one chain.
pub struct UrlMapper {
    rules: RwLock<CompiledTable>,
    max_depth: usize,
}

impl UrlMapper {
    pub fn new(table: MappingTable) -> Self {
        Self {
            rules: RwLock::new(CompiledTable::compile(table)),
            max_depth: DEFAULT_MAX_MAPPING_DEPTH,
        }
    }

    /// Override the pass limit (default [`DEFAULT_MAX_MAPPING_DEPTH`]).
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Rewrite `url` until it reaches a fixpoint or the pass limit.
    pub fn map(&self, url: &str) -> String {
        self.trace(url).url
    }

    /// Like [`map`](Self::map) but also reports how the chain ended.
    pub fn trace(&self, url: &str) -> MappedUrl {
        let rules = self.rules.read().unwrap_or_else(PoisonError::into_inner);

        let mut current = url.to_string();
        let mut passes = 0;
        while passes < self.max_depth {
            let next = rules.apply_once(&current);
            if next == current {
                break;
            }
            current = next;
            passes += 1;
        }

        let depth_exceeded = passes >= self.max_depth;
        if depth_exceeded {
            warn!(
                "mapping: max mapping depth ({}) reached for {url}, using {current}",
                self.max_depth
            );
        }

        MappedUrl {
            url: current,
            passes,
            depth_exceeded,
        }
    }

    /// A single rewrite pass, without chaining.
    pub fn map_once(&self, url: &str) -> String {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .apply_once(url)
    }

    /// Replace the whole table. Returns the new rule count.
    pub fn replace(&self, table: MappingTable) -> usize {
        let compiled = CompiledTable::compile(table);
        let count = compiled.table.len();
        *self.rules.write().unwrap_or_else(PoisonError::into_inner) = compiled;
        count
    }

    /// Drop every rule. Returns how many were removed.
    pub fn clear(&self) -> usize {
        let mut rules = self.rules.write().unwrap_or_else(PoisonError::into_inner);
        let count = rules.table.len();
        *rules = CompiledTable::compile(MappingTable::new());
        count
    }

    /// A snapshot of the current table.
    pub fn table(&self) -> MappingTable {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .table
            .clone()
    }

    pub fn len(&self) -> usize {
        self.rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .table
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for UrlMapper {
    fn default() -> Self {
        Self::new(MappingTable::new())
    }
}

// --- tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(rules: &[(&str, &str)]) -> UrlMapper {
        UrlMapper::new(rules.iter().copied().collect())
    }

    #[test]
    fn unmatched_url_is_unchanged() {
        let m = mapper(&[("http://a.example/x", "http://b.example/x")]);
        let traced = m.trace("http://c.example/");
        assert_eq!(traced.url, "http://c.example/");
        assert_eq!(traced.passes, 0);
        assert!(!traced.depth_exceeded);
    }

    #[test]
    fn chained_mappings_reach_fixpoint() {
        let m = mapper(&[("a", "b"), ("b", "c")]);
        assert_eq!(m.map("a"), "c");
        assert_eq!(m.map_once("a"), "b");
        assert_eq!(m.trace("a").passes, 2);
    }

    #[test]
    fn self_mapping_is_a_single_noop_pass() {
        let m = mapper(&[("x", "x")]);
        let traced = m.trace("x");
        assert_eq!(traced.url, "x");
        assert_eq!(traced.passes, 0);
        assert!(!traced.depth_exceeded);
    }

    #[test]
    fn wildcard_fills_rest_placeholder() {
        let m = mapper(&[("http://example.org/*", "file:///data/${rest}")]);
        assert_eq!(m.map("http://example.org/foo/bar"), "file:///data/foo/bar");
    }

    #[test]
    fn wildcard_supports_numbered_back_references() {
        let m = mapper(&[("https://*.example.org/*", "http://localhost:8080/$1/$2")]);
        assert_eq!(
            m.map("https://docs.example.org/ctx.jsonld"),
            "http://localhost:8080/docs/ctx.jsonld"
        );
    }

    #[test]
    fn wildcard_pattern_is_literal_outside_the_marker() {
        // The `.` must not match arbitrary characters.
        let m = mapper(&[("http://example.org/*", "file:///data/${rest}")]);
        assert_eq!(m.map("http://exampleXorg/foo"), "http://exampleXorg/foo");
    }

    #[test]
    fn exact_match_beats_wildcard() {
        let m = mapper(&[
            ("http://example.org/*", "file:///wild/${rest}"),
            ("http://example.org/special", "file:///exact.json"),
        ]);
        assert_eq!(m.map("http://example.org/special"), "file:///exact.json");
        assert_eq!(m.map("http://example.org/other"), "file:///wild/other");
    }

    #[test]
    fn first_matching_wildcard_wins() {
        let m = mapper(&[
            ("http://example.org/a/*", "file:///first/${rest}"),
            ("http://example.org/*", "file:///second/${rest}"),
        ]);
        assert_eq!(m.map("http://example.org/a/doc"), "file:///first/doc");
    }

    #[test]
    fn wildcard_redirect_chains_into_exact_rule() {
        let m = mapper(&[
            ("https://w3id.org/*", "https://staging.example.org/${rest}"),
            ("https://staging.example.org/ctx", "/srv/contexts/ctx.jsonld"),
        ]);
        assert_eq!(m.map("https://w3id.org/ctx"), "/srv/contexts/ctx.jsonld");
    }

    #[test]
    fn cyclic_table_stops_at_depth_cap() {
        let m = mapper(&[("a", "b"), ("b", "a")]).with_max_depth(3);
        let traced = m.trace("a");
        assert!(traced.depth_exceeded);
        assert_eq!(traced.passes, 3);
        assert_eq!(traced.url, "b");
    }

    #[test]
    fn replace_and_clear_are_wholesale() {
        let m = mapper(&[("a", "b")]);
        assert_eq!(m.replace([("c", "d"), ("e", "f")].into_iter().collect()), 2);
        assert_eq!(m.map("a"), "a");
        assert_eq!(m.map("c"), "d");
        assert_eq!(m.clear(), 2);
        assert!(m.is_empty());
    }

    #[test]
    fn table_preserves_definition_order() {
        let table: MappingTable =
            serde_json::from_str(r#"{"z": "1", "a": "2", "m": "3"}"#).unwrap();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["z", "a", "m"]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"z":"1","a":"2","m":"3"}"#);
    }

    #[test]
    fn from_file_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mappings.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            MappingTable::from_file(&path),
            Err(MappingError::Parse { .. })
        ));
        assert!(matches!(
            MappingTable::from_file(dir.path().join("missing.json")),
            Err(MappingError::Read { .. })
        ));
    }
}
