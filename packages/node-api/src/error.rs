//! Standard error response body.

use serde::{Deserialize, Serialize};

/// The JSON body returned for all error responses.
///
/// ```json
/// { "error": "Missing url", "code": "invalid_request" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Human-readable description of the problem.
    pub error: String,

    /// Machine-readable error code.
    ///
    /// | `code` | HTTP status |
    /// |--------|------------|
    /// | `invalid_request` | 400 |
    /// | `not_found` | 404 |
    /// | `internal_error` | 500 |
    /// | `resolution_failed` | 502 |
    pub code: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a static code and message.
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

/// Well-known error codes.
pub mod codes {
    pub const INVALID_REQUEST: &str = "invalid_request";
    pub const NOT_FOUND: &str = "not_found";
    pub const INTERNAL_ERROR: &str = "internal_error";
    pub const RESOLUTION_FAILED: &str = "resolution_failed";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_error_then_code() {
        let e = ErrorResponse::new(codes::INVALID_REQUEST, "Missing url");
        assert_eq!(
            serde_json::to_string(&e).unwrap(),
            r#"{"error":"Missing url","code":"invalid_request"}"#
        );
    }
}
