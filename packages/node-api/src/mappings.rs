//! Mapping table administration: `/mappings`.

use ldr::MappingTable;
use serde::{Deserialize, Serialize};

/// Response body for `GET /mappings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MappingsResponse {
    pub mappings: MappingTable,
}

/// Request body for `POST /mappings`.
///
/// Exactly one of the two fields is expected. `file` names a mapping file on
/// the server's filesystem; `mappings` carries the table inline. When both
/// are present, `file` wins.
///
/// ```json
/// { "mappings": { "https://w3id.org/example/*": "file:///srv/vocab/${rest}.jsonld" } }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetMappingsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mappings: Option<MappingTable>,
}

/// Response body for `POST /mappings`: the table now in effect.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SetMappingsResponse {
    pub message: String,
    pub count: usize,
    pub mappings: MappingTable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_mappings_keep_their_order() {
        let req: SetMappingsRequest = serde_json::from_str(
            r#"{"mappings": {"http://b/*": "file:///b/${rest}", "http://a/*": "file:///a/${rest}"}}"#,
        )
        .unwrap();
        let table = req.mappings.unwrap();
        let patterns: Vec<&str> = table.iter().map(|(pattern, _)| pattern).collect();
        assert_eq!(patterns, vec!["http://b/*", "http://a/*"]);
        assert!(req.file.is_none());
    }
}
