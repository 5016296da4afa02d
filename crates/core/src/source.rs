//! Candidate source model.
//!
//! A candidate source is either a saved search or a saved list. Both share
//! identity and sharing metadata ([`SourceInfo`]); the variant is carried by
//! the [`CandidateSource`] enum itself and read through [`CandidateSource::kind`].

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Review status of a candidate within a reviewable saved search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Verified,
    Rejected,
    Unverified,
}

/// The review-status filter a reviewable search starts with.
pub const DEFAULT_REVIEW_STATUS_FILTER: [ReviewStatus; 2] = [ReviewStatus::Pending, ReviewStatus::Verified];

/// Whether `filter` selects exactly the default statuses, ignoring order and duplicates.
pub fn is_default_review_filter(filter: &[ReviewStatus]) -> bool {
    let given: BTreeSet<_> = filter.iter().copied().collect();
    let default: BTreeSet<_> = DEFAULT_REVIEW_STATUS_FILTER.iter().copied().collect();
    given == default
}

/// Discriminator for the two source variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    SavedSearch,
    SavedList,
}

impl SourceKind {
    /// Stable tag used in durable keys and REST paths.
    pub fn tag(self) -> &'static str {
        match self {
            SourceKind::SavedSearch => "saved-search",
            SourceKind::SavedList => "saved-list",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Reference to a user a source is shared with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// Link to an external job opportunity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OpportunityIds {
    pub id: i64,
    #[serde(default)]
    pub sf_id: Option<String>,
}

/// Attributes common to both source variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SourceInfo {
    pub id: i64,
    pub name: String,
    /// Only the owner may structurally edit a fixed source.
    #[serde(default)]
    pub fixed: bool,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub users: Vec<UserRef>,
    #[serde(default)]
    pub watcher_user_ids: Vec<i64>,
    #[serde(default)]
    pub sf_job_opp: Option<OpportunityIds>,
}

impl SourceInfo {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            fixed: false,
            global: false,
            users: Vec::new(),
            watcher_user_ids: Vec::new(),
            sf_job_opp: None,
        }
    }
}

/// An ad-hoc saved search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearch {
    #[serde(flatten)]
    pub info: SourceInfo,
    #[serde(default)]
    pub reviewable: bool,
    #[serde(default)]
    pub review_status_filter: Vec<ReviewStatus>,
    /// Free-text query term; when present, results default to relevance order.
    #[serde(default)]
    pub simple_query_string: Option<String>,
}

/// Minimal reference to the search a list was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedSearchRef {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
}

/// A curated saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedList {
    #[serde(flatten)]
    pub info: SourceInfo,
    #[serde(default)]
    pub saved_search_source: Option<SavedSearchRef>,
}

/// A saved search or a saved list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CandidateSource {
    SavedSearch(SavedSearch),
    SavedList(SavedList),
}

impl CandidateSource {
    /// The single variant discriminator. Code that needs to branch on the
    /// kind of source goes through here.
    pub fn kind(&self) -> SourceKind {
        match self {
            CandidateSource::SavedSearch(_) => SourceKind::SavedSearch,
            CandidateSource::SavedList(_) => SourceKind::SavedList,
        }
    }

    pub fn info(&self) -> &SourceInfo {
        match self {
            CandidateSource::SavedSearch(s) => &s.info,
            CandidateSource::SavedList(l) => &l.info,
        }
    }

    pub fn id(&self) -> i64 {
        self.info().id
    }

    pub fn name(&self) -> &str {
        &self.info().name
    }

    /// Reviewable searches filter their results by review status. Lists never do.
    pub fn is_reviewable(&self) -> bool {
        match self {
            CandidateSource::SavedSearch(s) => s.reviewable,
            CandidateSource::SavedList(_) => false,
        }
    }

    /// Non-empty free-text query term, if this is a search that has one.
    pub fn text_query(&self) -> Option<&str> {
        match self {
            CandidateSource::SavedSearch(s) => s.simple_query_string.as_deref().filter(|q| !q.trim().is_empty()),
            CandidateSource::SavedList(_) => None,
        }
    }
}

impl From<SavedSearch> for CandidateSource {
    fn from(search: SavedSearch) -> Self {
        CandidateSource::SavedSearch(search)
    }
}

impl From<SavedList> for CandidateSource {
    fn from(list: SavedList) -> Self {
        CandidateSource::SavedList(list)
    }
}

impl fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind(), self.id(), self.name())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn list(id: i64) -> CandidateSource {
        SavedList { info: SourceInfo::new(id, format!("list {id}")), saved_search_source: None }.into()
    }

    pub fn search(id: i64, reviewable: bool) -> CandidateSource {
        SavedSearch {
            info: SourceInfo::new(id, format!("search {id}")),
            reviewable,
            review_status_filter: Vec::new(),
            simple_query_string: None,
        }
        .into()
    }

    pub fn text_search(id: i64, query: &str) -> CandidateSource {
        SavedSearch {
            info: SourceInfo::new(id, format!("search {id}")),
            reviewable: false,
            review_status_filter: Vec::new(),
            simple_query_string: Some(query.to_string()),
        }
        .into()
    }
}
