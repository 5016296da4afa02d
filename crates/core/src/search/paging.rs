//! Per-screen paging and sort state.

use serde::{Deserialize, Serialize};

use super::request::{PagedSearchRequest, SortDirection};
use crate::cache::CachedPage;
use crate::source::{CandidateSource, ReviewStatus};

/// Default sort column.
pub const ID_SORT_FIELD: &str = "id";

/// Sort column used when a search carries a free-text query.
pub const RELEVANCE_SORT_FIELD: &str = "text_match";

/// Sort column a source starts with when nothing else is known.
pub fn default_sort_field(source: &CandidateSource) -> &'static str {
    if source.text_query().is_some() { RELEVANCE_SORT_FIELD } else { ID_SORT_FIELD }
}

/// Paging and sort state of one screen. Unset fields are filled in by
/// [`PageState::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
}

/// Fully defaulted paging and sort parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    /// One-based.
    pub page_number: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
}

impl PageState {
    /// Fill in any missing values and return the complete parameter set.
    ///
    /// Defaults: page 1, `default_page_size`, `id` (or relevance for text
    /// searches), descending.
    pub fn resolve(&mut self, source: &CandidateSource, default_page_size: u32) -> ResolvedPage {
        let page_number = *self.page_number.get_or_insert(1);
        let page_size = *self.page_size.get_or_insert(default_page_size);
        let sort_field = self
            .sort_field
            .get_or_insert_with(|| default_sort_field(source).to_string())
            .clone();
        let sort_direction = *self.sort_direction.get_or_insert(SortDirection::Desc);

        ResolvedPage { page_number, page_size, sort_field, sort_direction }
    }

    /// Take over the paging and sort state of a cached page.
    pub fn adopt(&mut self, cached: &CachedPage) {
        self.page_number = Some(cached.page_number);
        self.page_size = Some(cached.page_size);
        if let Some(field) = cached.sort_fields.first() {
            self.sort_field = Some(field.clone());
        }
        self.sort_direction = Some(cached.sort_direction);
    }

    /// Clicking the current sort column flips direction; clicking another
    /// column sorts by it ascending.
    pub fn toggle_sort(&mut self, column: &str) {
        if self.sort_field.as_deref() == Some(column) {
            self.sort_direction = Some(self.sort_direction.unwrap_or_default().flipped());
        } else {
            self.sort_field = Some(column.to_string());
            self.sort_direction = Some(SortDirection::Asc);
        }
    }

    /// Whether `cached` was fetched with exactly the requested page and size.
    pub fn matches(&self, cached: &CachedPage) -> bool {
        self.page_number == Some(cached.page_number) && self.page_size == Some(cached.page_size)
    }
}

impl ResolvedPage {
    /// Build the wire request. The review filter is only attached for
    /// reviewable searches.
    pub fn to_request(&self, source: &CandidateSource, review_filter: &[ReviewStatus]) -> PagedSearchRequest {
        PagedSearchRequest {
            page_number: self.page_number.saturating_sub(1),
            page_size: self.page_size,
            sort_fields: vec![self.sort_field.clone()],
            sort_direction: self.sort_direction,
            review_status_filter: source.is_reviewable().then(|| review_filter.to_vec()),
        }
    }
}
