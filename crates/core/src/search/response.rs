//! Paged search response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One page of results as returned by the server.
///
/// `number` is the zero-based page the server actually used. The server does
/// not echo the sort order, so callers keep their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    pub number: u32,
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub first: bool,
    #[serde(default)]
    pub last: bool,
    /// Result items, opaque to the cache.
    #[serde(default)]
    pub content: Vec<serde_json::Value>,
}

impl SearchPage {
    /// One-based page number, as presented to users.
    pub fn page_number(&self) -> u32 {
        self.number.saturating_add(1)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_spring_page() {
        let json = r#"{
            "number": 1,
            "size": 20,
            "totalElements": 45,
            "totalPages": 3,
            "first": false,
            "last": false,
            "content": [{"id": 101}, {"id": 102}],
            "sort": {"sorted": true}
        }"#;
        let page: SearchPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page_number(), 2);
        assert_eq!(page.total_elements, 45);
        assert_eq!(page.content.len(), 2);
        assert!(!page.is_empty());
    }

    #[test]
    fn test_parse_minimal_page() {
        let page: SearchPage = serde_json::from_str(r#"{"number":0,"size":12}"#).unwrap();
        assert_eq!(page.page_number(), 1);
        assert!(page.is_empty());
    }
}
