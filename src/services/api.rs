//! Wire types for the remote search endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(default)]
    pub search_term: Option<String>,
}

impl SearchRequest {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            search_term: Some(term.into()),
        }
    }

    /// The term, if present and non-empty.
    pub fn term(&self) -> Option<&str> {
        self.search_term.as_deref().filter(|t| !t.is_empty())
    }
}

/// Successful response: offsets into the shared catalog ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub indices: Vec<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_name() {
        let json = serde_json::to_string(&SearchRequest::new("grin")).unwrap();
        assert_eq!(json, r#"{"searchTerm":"grin"}"#);
    }

    #[test]
    fn test_missing_or_empty_term() {
        let missing: SearchRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.term(), None);

        let empty: SearchRequest = serde_json::from_str(r#"{"searchTerm":""}"#).unwrap();
        assert_eq!(empty.term(), None);
    }
}
