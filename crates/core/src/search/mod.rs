//! Paged search over candidate sources.
//!
//! The remote side is reached through [`RemoteSearch`]; [`PagedSearch`] puts
//! the result cache in front of it.

pub mod orchestrator;
pub mod paging;
pub mod request;
pub mod response;

pub use orchestrator::{LoadOutcome, PagedSearch, SearchPhase};
pub use paging::{ID_SORT_FIELD, PageState, RELEVANCE_SORT_FIELD, ResolvedPage, default_sort_field};
pub use request::{MAX_PAGE_SIZE, PagedSearchRequest, SortDirection};
pub use response::SearchPage;

use std::sync::Arc;

use async_trait::async_trait;

use crate::Error;
use crate::source::CandidateSource;

/// Remote paged search over a candidate source.
#[async_trait]
pub trait RemoteSearch: Send + Sync {
    /// Fetch one page of `source` as described by `request`.
    async fn search_paged(&self, source: &CandidateSource, request: &PagedSearchRequest) -> Result<SearchPage, Error>;
}

#[async_trait]
impl<T: RemoteSearch + ?Sized> RemoteSearch for Arc<T> {
    async fn search_paged(&self, source: &CandidateSource, request: &PagedSearchRequest) -> Result<SearchPage, Error> {
        (**self).search_paged(source, request).await
    }
}
