//! Paged search request types and validation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::source::ReviewStatus;

/// Upper bound on a single page, matching what the REST API accepts.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Sort order for paged results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Request body for a remote paged search over a candidate source.
///
/// `page_number` is zero-based here because that is what the server expects;
/// everything user-facing is one-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedSearchRequest {
    pub page_number: u32,
    pub page_size: u32,
    pub sort_fields: Vec<String>,
    pub sort_direction: SortDirection,
    /// Only sent for reviewable searches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_status_filter: Option<Vec<ReviewStatus>>,
}

impl PagedSearchRequest {
    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), Error> {
        if self.page_size == 0 {
            return Err(Error::InvalidInput("page size must be greater than 0".into()));
        }

        if self.page_size > MAX_PAGE_SIZE {
            return Err(Error::InvalidInput(format!(
                "page size too large: {} (max {MAX_PAGE_SIZE})",
                self.page_size
            )));
        }

        if self.sort_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(Error::InvalidInput("sort fields cannot be blank".into()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PagedSearchRequest {
        PagedSearchRequest {
            page_number: 0,
            page_size: 20,
            sort_fields: vec!["id".into()],
            sort_direction: SortDirection::Desc,
            review_status_filter: None,
        }
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(request()).unwrap();
        assert_eq!(json["pageNumber"], 0);
        assert_eq!(json["pageSize"], 20);
        assert_eq!(json["sortFields"][0], "id");
        assert_eq!(json["sortDirection"], "DESC");
        assert!(json.get("reviewStatusFilter").is_none());

        let filtered = PagedSearchRequest { review_status_filter: Some(vec![ReviewStatus::Rejected]), ..request() };
        let json = serde_json::to_value(filtered).unwrap();
        assert_eq!(json["reviewStatusFilter"][0], "rejected");
    }

    #[test]
    fn test_validate() {
        assert!(request().validate().is_ok());
        assert!(PagedSearchRequest { page_size: 0, ..request() }.validate().is_err());
        assert!(PagedSearchRequest { page_size: MAX_PAGE_SIZE, ..request() }.validate().is_ok());
        assert!(PagedSearchRequest { page_size: MAX_PAGE_SIZE + 1, ..request() }.validate().is_err());
        assert!(PagedSearchRequest { sort_fields: vec![" ".into()], ..request() }.validate().is_err());
    }

    #[test]
    fn test_sort_direction_flip() {
        assert_eq!(SortDirection::Asc.flipped(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.flipped(), SortDirection::Asc);
        assert_eq!(SortDirection::default(), SortDirection::Desc);
    }
}
