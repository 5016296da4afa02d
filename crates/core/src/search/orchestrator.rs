//! Cache-first paged search for one screen.
//!
//! A [`PagedSearch`] holds the paging, sort and review-filter state of a
//! single "show results for this source" screen. Loading consults the shared
//! [`SourceResultCache`] first and falls back to the remote search, writing
//! successful fetches back when the source is cacheable.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::paging::PageState;
use super::request::{MAX_PAGE_SIZE, SortDirection};
use super::response::SearchPage;
use super::RemoteSearch;
use crate::Error;
use crate::cache::{CachedPage, KeyValueStore, SourceResultCache, key_for};
use crate::policy::is_cacheable;
use crate::source::{CandidateSource, DEFAULT_REVIEW_STATUS_FILTER, ReviewStatus};

/// Where a screen is in its load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    Idle,
    CheckingCache,
    Fetching,
    Rendering,
}

/// Result of a load: the page to show and the state it was shown with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadOutcome {
    pub source_id: i64,
    /// One-based.
    pub page_number: u32,
    pub page_size: u32,
    pub sort_field: String,
    pub sort_direction: SortDirection,
    pub results: SearchPage,
    #[schemars(with = "String")]
    pub captured_at: DateTime<Utc>,
    pub from_cache: bool,
}

/// Paged search orchestrator for one screen.
pub struct PagedSearch<R, S> {
    remote: R,
    cache: Arc<SourceResultCache<S>>,
    default_page_size: u32,
    source_key: Option<String>,
    state: PageState,
    review_filter: Vec<ReviewStatus>,
    phase: SearchPhase,
}

impl<R: RemoteSearch, S: KeyValueStore> PagedSearch<R, S> {
    pub fn new(remote: R, cache: Arc<SourceResultCache<S>>, default_page_size: u32) -> Self {
        Self {
            remote,
            cache,
            default_page_size,
            source_key: None,
            state: PageState::default(),
            review_filter: DEFAULT_REVIEW_STATUS_FILTER.to_vec(),
            phase: SearchPhase::Idle,
        }
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, SearchPhase::CheckingCache | SearchPhase::Fetching)
    }

    pub fn review_filter(&self) -> &[ReviewStatus] {
        &self.review_filter
    }

    /// Change the review-status filter applied to reviewable searches.
    ///
    /// Takes effect on the next load.
    pub fn set_review_filter(&mut self, filter: Vec<ReviewStatus>) {
        self.review_filter = filter;
    }

    /// Load results for `source`.
    ///
    /// Passing `page_number` asks for that specific page: a cached page is
    /// then only used if its page number and size match. Without it, whatever
    /// page is cached is shown. `force_refresh` skips the cache read.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` for a zero page number, or a page size
    /// of zero or above [`MAX_PAGE_SIZE`], before any screen state changes. Returns the
    /// remote error verbatim when the fetch fails. A failed fetch never
    /// touches the cache.
    pub async fn load(
        &mut self, source: &CandidateSource, page_number: Option<u32>, page_size: Option<u32>, force_refresh: bool,
    ) -> Result<LoadOutcome, Error> {
        if page_number == Some(0) {
            return Err(Error::InvalidInput("page number is one-based".into()));
        }
        if page_size == Some(0) {
            return Err(Error::InvalidInput("page size must be greater than 0".into()));
        }
        if let Some(size) = page_size.filter(|&size| size > MAX_PAGE_SIZE) {
            return Err(Error::InvalidInput(format!("page size too large: {size} (max {MAX_PAGE_SIZE})")));
        }

        self.select(source);
        if page_number.is_some() {
            self.state.page_number = page_number;
        }
        if page_size.is_some() {
            self.state.page_size = page_size;
        }
        self.state.page_size.get_or_insert(self.default_page_size);

        let use_page_number = page_number.is_some();

        if !force_refresh && is_cacheable(source, &self.review_filter) {
            self.phase = SearchPhase::CheckingCache;
            if let Some(cached) = self.cache.get(source).await {
                if !use_page_number || self.state.matches(&cached) {
                    tracing::debug!(source = %source, page = cached.page_number, "cache hit");
                    self.state.adopt(&cached);
                    self.phase = SearchPhase::Rendering;
                    return Ok(self.outcome(cached.source_id, cached.results, cached.captured_at, true));
                }
                tracing::debug!(
                    source = %source,
                    cached_page = cached.page_number,
                    requested_page = ?self.state.page_number,
                    "cached page does not match request"
                );
            }
        }

        self.fetch(source).await
    }

    /// Reload `source` from the server, ignoring any cached page.
    pub async fn refresh(&mut self, source: &CandidateSource) -> Result<LoadOutcome, Error> {
        self.load(source, None, None, true).await
    }

    /// Move to a specific page, using the cache when it holds exactly that page.
    pub async fn go_to_page(&mut self, source: &CandidateSource, page_number: u32) -> Result<LoadOutcome, Error> {
        self.load(source, Some(page_number), None, false).await
    }

    /// Sort by `column`, flipping direction if it is already the sort column.
    ///
    /// Always refetches: a cached page is only valid for the order it was
    /// fetched in.
    pub async fn toggle_sort(&mut self, source: &CandidateSource, column: &str) -> Result<LoadOutcome, Error> {
        self.select(source);
        self.state.toggle_sort(column);
        self.load(source, None, None, true).await
    }

    /// Drop the cached page for `source` so the next load misses.
    pub async fn invalidate(&self, source: &CandidateSource) {
        self.cache.remove(source).await;
    }

    /// Switch the screen to `source`, resetting paging state if it changed.
    fn select(&mut self, source: &CandidateSource) {
        let key = key_for(source);
        if self.source_key.as_deref() != Some(key.as_str()) {
            self.state = PageState::default();
            self.source_key = Some(key);
        }
    }

    async fn fetch(&mut self, source: &CandidateSource) -> Result<LoadOutcome, Error> {
        let resolved = self.state.resolve(source, self.default_page_size);
        let request = resolved.to_request(source, &self.review_filter);
        if let Err(e) = request.validate() {
            self.phase = SearchPhase::Idle;
            return Err(e);
        }

        self.phase = SearchPhase::Fetching;
        tracing::debug!(
            source = %source,
            page = resolved.page_number,
            size = resolved.page_size,
            sort = %resolved.sort_field,
            "fetching source results"
        );

        let page = match self.remote.search_paged(source, &request).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(source = %source, error = %e, "source search failed");
                self.phase = SearchPhase::Idle;
                return Err(e);
            }
        };

        // The server echoes the paging it actually used but not the sort.
        self.state.page_number = Some(page.page_number());
        if page.size > 0 {
            self.state.page_size = Some(page.size);
        }

        let captured_at = Utc::now();
        if is_cacheable(source, &self.review_filter) {
            let cached = CachedPage {
                source_id: source.id(),
                page_number: page.page_number(),
                page_size: self.state.page_size.unwrap_or(resolved.page_size),
                sort_fields: vec![resolved.sort_field.clone()],
                sort_direction: resolved.sort_direction,
                results: page.clone(),
                captured_at,
            };
            self.cache.put(source, &cached).await;
        }

        self.phase = SearchPhase::Rendering;
        Ok(self.outcome(source.id(), page, captured_at, false))
    }

    fn outcome(&self, source_id: i64, results: SearchPage, captured_at: DateTime<Utc>, from_cache: bool) -> LoadOutcome {
        LoadOutcome {
            source_id,
            page_number: self.state.page_number.unwrap_or(1),
            page_size: self.state.page_size.unwrap_or(self.default_page_size),
            sort_field: self.state.sort_field.clone().unwrap_or_default(),
            sort_direction: self.state.sort_direction.unwrap_or_default(),
            results,
            captured_at,
            from_cache,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::cache::MemoryStore;
    use crate::search::PagedSearchRequest;
    use crate::source::fixtures::{list, search, text_search};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Remote that answers with the requested page and records every call.
    #[derive(Default)]
    pub(crate) struct FakeRemote {
        pub calls: Mutex<Vec<PagedSearchRequest>>,
        pub fail: Mutex<bool>,
    }

    impl FakeRemote {
        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn last_call(&self) -> PagedSearchRequest {
            self.calls.lock().unwrap().last().cloned().unwrap()
        }

        pub fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }
    }

    #[async_trait]
    impl RemoteSearch for FakeRemote {
        async fn search_paged(
            &self, source: &CandidateSource, request: &PagedSearchRequest,
        ) -> Result<SearchPage, Error> {
            self.calls.lock().unwrap().push(request.clone());
            if *self.fail.lock().unwrap() {
                return Err(Error::SearchFailed("HTTP 503".into()));
            }
            Ok(SearchPage {
                number: request.page_number,
                size: request.page_size,
                total_elements: 100,
                total_pages: 100 / request.page_size.max(1),
                first: request.page_number == 0,
                last: false,
                content: vec![serde_json::json!({"sourceId": source.id(), "page": request.page_number})],
            })
        }
    }

    type Screen = PagedSearch<Arc<FakeRemote>, MemoryStore>;

    fn screen() -> (Screen, Arc<FakeRemote>, Arc<SourceResultCache<MemoryStore>>) {
        let remote = Arc::new(FakeRemote::default());
        let cache = Arc::new(SourceResultCache::new(MemoryStore::new()));
        (PagedSearch::new(remote.clone(), cache.clone(), 20), remote, cache)
    }

    #[tokio::test]
    async fn test_miss_then_hit() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        let first = screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(!first.from_cache);
        assert_eq!(remote.call_count(), 1);
        assert_eq!(remote.last_call().page_number, 0);
        assert_eq!(remote.last_call().page_size, 20);

        let entry = cache.get(&source).await.unwrap();
        assert_eq!((entry.source_id, entry.page_number, entry.page_size), (7, 1, 20));
        assert_eq!(entry.captured_at, first.captured_at);

        let second = screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(second.from_cache);
        assert_eq!(remote.call_count(), 1);
        assert_eq!(second.results, entry.results);
        assert_eq!(screen.phase(), SearchPhase::Rendering);
    }

    #[tokio::test]
    async fn test_page_mismatch_refetches_and_replaces() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        let outcome = screen.load(&source, Some(2), Some(20), false).await.unwrap();

        assert!(!outcome.from_cache);
        assert_eq!(remote.call_count(), 2);
        assert_eq!(remote.last_call().page_number, 1);
        assert_eq!(cache.get(&source).await.unwrap().page_number, 2);
        assert_eq!(cache.tracked(), 1);
    }

    #[tokio::test]
    async fn test_size_mismatch_refetches() {
        let (mut screen, remote, _cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        screen.load(&source, Some(1), Some(50), false).await.unwrap();
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn test_without_page_number_any_cached_page_is_used() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        screen.load(&source, Some(3), Some(20), false).await.unwrap();

        let (mut other_screen, _, _) = screen_sharing(&remote, &cache);
        let outcome = other_screen.load(&source, None, None, false).await.unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.page_number, 3);
        assert_eq!(other_screen.state().page_number, Some(3));
        assert_eq!(remote.call_count(), 1);
    }

    fn screen_sharing(
        remote: &Arc<FakeRemote>, cache: &Arc<SourceResultCache<MemoryStore>>,
    ) -> (Screen, Arc<FakeRemote>, Arc<SourceResultCache<MemoryStore>>) {
        (PagedSearch::new(remote.clone(), cache.clone(), 20), remote.clone(), cache.clone())
    }

    #[tokio::test]
    async fn test_force_refresh_skips_cache_but_writes() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        let first = screen.load(&source, Some(1), Some(20), false).await.unwrap();
        let refreshed = screen.refresh(&source).await.unwrap();

        assert!(!refreshed.from_cache);
        assert_eq!(remote.call_count(), 2);
        assert!(cache.get(&source).await.unwrap().captured_at >= first.captured_at);
    }

    #[tokio::test]
    async fn test_reviewable_search_with_custom_filter_is_not_cached() {
        let (mut screen, remote, cache) = screen();
        let source = search(9, true);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(cache.get(&source).await.is_some());
        assert_eq!(remote.last_call().review_status_filter, Some(DEFAULT_REVIEW_STATUS_FILTER.to_vec()));

        cache.remove(&source).await;
        screen.set_review_filter(vec![ReviewStatus::Rejected]);
        let outcome = screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(!outcome.from_cache);
        assert_eq!(remote.last_call().review_status_filter, Some(vec![ReviewStatus::Rejected]));
        assert!(cache.get(&source).await.is_none());

        screen.set_review_filter(vec![ReviewStatus::Verified, ReviewStatus::Pending]);
        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(cache.get(&source).await.is_some());
        assert_eq!(remote.call_count(), 3);
    }

    #[tokio::test]
    async fn test_custom_filter_ignores_existing_entry() {
        let (mut screen, remote, cache) = screen();
        let source = search(9, true);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        let before = cache.get(&source).await.unwrap();

        screen.set_review_filter(vec![ReviewStatus::Rejected]);
        let outcome = screen.load(&source, Some(1), Some(20), false).await.unwrap();
        assert!(!outcome.from_cache);
        assert_eq!(remote.call_count(), 2);
        assert_eq!(cache.get(&source).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_untouched() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        let before = cache.get(&source).await;

        remote.set_failing(true);
        let err = screen.load(&source, Some(2), Some(20), false).await.unwrap_err();
        assert!(matches!(err, Error::SearchFailed(_)));
        assert_eq!(cache.get(&source).await, before);
        assert!(!screen.is_searching());
        assert_eq!(screen.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_failed_first_fetch_writes_nothing() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);
        remote.set_failing(true);

        assert!(screen.load(&source, None, None, false).await.is_err());
        assert!(cache.get(&source).await.is_none());
        assert_eq!(cache.tracked(), 0);
    }

    #[tokio::test]
    async fn test_invalidate_forces_miss() {
        let (mut screen, remote, _cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        screen.invalidate(&source).await;
        let outcome = screen.load(&source, Some(1), Some(20), false).await.unwrap();

        assert!(!outcome.from_cache);
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn test_defaults_for_fresh_screen() {
        let (mut screen, remote, _cache) = screen();

        let outcome = screen.load(&list(7), None, None, false).await.unwrap();
        assert_eq!(outcome.page_number, 1);
        assert_eq!(outcome.page_size, 20);
        assert_eq!(outcome.sort_field, "id");
        assert_eq!(outcome.sort_direction, SortDirection::Desc);

        screen.load(&text_search(3, "welder"), None, None, false).await.unwrap();
        assert_eq!(remote.last_call().sort_fields, vec!["text_match".to_string()]);
    }

    #[tokio::test]
    async fn test_switching_source_resets_paging() {
        let (mut screen, remote, _cache) = screen();

        screen.load(&list(7), Some(4), Some(50), false).await.unwrap();
        screen.load(&list(8), None, None, false).await.unwrap();

        let call = remote.last_call();
        assert_eq!(call.page_number, 0);
        assert_eq!(call.page_size, 20);
    }

    #[tokio::test]
    async fn test_toggle_sort_forces_refresh() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();

        let outcome = screen.toggle_sort(&source, "id").await.unwrap();
        assert!(!outcome.from_cache);
        assert_eq!(outcome.sort_direction, SortDirection::Asc);
        assert_eq!(remote.call_count(), 2);

        let outcome = screen.toggle_sort(&source, "name").await.unwrap();
        assert_eq!(outcome.sort_field, "name");
        assert_eq!(outcome.sort_direction, SortDirection::Asc);
        assert_eq!(remote.last_call().sort_fields, vec!["name".to_string()]);
        assert_eq!(cache.get(&source).await.unwrap().sort_fields, vec!["name".to_string()]);
    }

    #[tokio::test]
    async fn test_cache_hit_adopts_cached_sort() {
        let (mut screen, remote, cache) = screen();
        let source = list(7);

        screen.load(&source, Some(1), Some(20), false).await.unwrap();
        screen.toggle_sort(&source, "name").await.unwrap();

        let (mut fresh, _, _) = screen_sharing(&remote, &cache);
        let outcome = fresh.go_to_page(&source, 1).await.unwrap();
        assert!(outcome.from_cache);
        assert_eq!(outcome.sort_field, "name");
        assert_eq!(fresh.state().sort_direction, Some(SortDirection::Asc));
    }

    #[tokio::test]
    async fn test_rejects_zero_paging() {
        let (mut screen, remote, _cache) = screen();
        assert!(matches!(screen.load(&list(7), Some(0), None, false).await, Err(Error::InvalidInput(_))));
        assert!(matches!(screen.load(&list(7), None, Some(0), false).await, Err(Error::InvalidInput(_))));
        assert_eq!(remote.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_page_leaves_screen_usable() {
        let (mut screen, remote, _cache) = screen();
        let err = screen.load(&list(7), Some(1), Some(MAX_PAGE_SIZE + 1), false).await;
        assert!(matches!(err, Err(Error::InvalidInput(_))));
        assert!(!screen.is_searching());
        assert_eq!(remote.call_count(), 0);

        let outcome = screen.load(&list(7), None, None, false).await.unwrap();
        assert_eq!(outcome.page_size, 20);
        assert_eq!(remote.call_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_echo_page_number_saturates() {
        struct EdgeRemote;

        #[async_trait]
        impl RemoteSearch for EdgeRemote {
            async fn search_paged(
                &self, _source: &CandidateSource, request: &PagedSearchRequest,
            ) -> Result<SearchPage, Error> {
                Ok(SearchPage { number: u32::MAX, size: request.page_size, ..Default::default() })
            }
        }

        let cache = Arc::new(SourceResultCache::new(MemoryStore::new()));
        let mut screen = PagedSearch::new(Arc::new(EdgeRemote), cache, 20);
        let outcome = screen.load(&list(7), Some(1), None, false).await.unwrap();
        assert_eq!(outcome.page_number, u32::MAX);
    }
}
