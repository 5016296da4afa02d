//! Cacheability policy.
//!
//! The cache key only captures the source, page and sort order. A non-default
//! review filter on a reviewable search changes the result set in a way that
//! key cannot represent, so such fetches are never cached.

use crate::source::{CandidateSource, ReviewStatus, is_default_review_filter};

/// Whether results for `source` under `review_filter` may be cached.
///
/// Lists are always cacheable. Searches are cacheable unless they are
/// reviewable and the filter differs from the default `{pending, verified}`.
pub fn is_cacheable(source: &CandidateSource, review_filter: &[ReviewStatus]) -> bool {
    match source {
        CandidateSource::SavedList(_) => true,
        CandidateSource::SavedSearch(search) => !search.reviewable || is_default_review_filter(review_filter),
    }
}
