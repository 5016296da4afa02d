//! Request bodies and endpoint paths for the admin REST API.

use serde::{Deserialize, Serialize};
use tcs_core::{CandidateSource, TargetList};

use super::ApiError;

/// Maximum candidates in one membership or status update.
pub const MAX_CANDIDATES_PER_REQUEST: usize = 10_000;

/// Candidates to merge into, remove from, or replace a list with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCandidatesRequest {
    pub candidate_ids: Vec<i64>,
    /// List the candidates were picked from, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_list_id: Option<i64>,
}

impl UpdateCandidatesRequest {
    pub fn new(candidate_ids: Vec<i64>) -> Self {
        Self { candidate_ids, source_list_id: None }
    }

    /// Validate the request parameters.
    ///
    /// An empty `candidate_ids` is allowed: replacing with nothing empties the list.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.candidate_ids.len() > MAX_CANDIDATES_PER_REQUEST {
            return Err(ApiError::InvalidRequest(format!(
                "too many candidates: {} (max {MAX_CANDIDATES_PER_REQUEST})",
                self.candidate_ids.len()
            )));
        }
        Ok(())
    }
}

/// Status change applied to a set of candidates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub candidate_ids: Vec<i64>,
    pub info: StatusInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusInfo {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_message: Option<String>,
}

impl StatusUpdateRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.candidate_ids.is_empty() {
            return Err(ApiError::InvalidRequest("no candidates selected".into()));
        }
        if self.candidate_ids.len() > MAX_CANDIDATES_PER_REQUEST {
            return Err(ApiError::InvalidRequest(format!(
                "too many candidates: {} (max {MAX_CANDIDATES_PER_REQUEST})",
                self.candidate_ids.len()
            )));
        }
        if self.info.status.trim().is_empty() {
            return Err(ApiError::InvalidRequest("status cannot be empty".into()));
        }
        Ok(())
    }
}

/// Body for star/unstar and watch/unwatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub user_id: i64,
}

/// Whether copied or saved candidates are added to the target list or replace it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentUpdateType {
    #[default]
    Add,
    Replace,
}

/// Destination of a copy or a selection save: an existing list or a new one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySourceContentsRequest {
    /// Existing list to write into; `None` creates a list named `new_list_name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_list_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_list_name: Option<String>,
    #[serde(default)]
    pub update_type: ContentUpdateType,
    /// Job to associate a newly created list with.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<i64>,
}

/// Saving a search selection takes the same destination shape as a copy.
pub type SaveSelectionRequest = CopySourceContentsRequest;

impl CopySourceContentsRequest {
    pub fn into_existing(list_id: i64, update_type: ContentUpdateType) -> Self {
        Self { saved_list_id: Some(list_id), update_type, ..Default::default() }
    }

    pub fn into_new(name: impl Into<String>) -> Self {
        Self { new_list_name: Some(name.into()), ..Default::default() }
    }

    /// Exactly one of `saved_list_id` and a non-blank `new_list_name`.
    pub fn validate(&self) -> Result<(), ApiError> {
        let named = self.new_list_name.as_deref().is_some_and(|n| !n.trim().is_empty());
        match (self.saved_list_id, named) {
            (Some(_), true) => {
                Err(ApiError::InvalidRequest("give either an existing list id or a new list name, not both".into()))
            }
            (None, false) => Err(ApiError::InvalidRequest("a target list id or new list name is required".into())),
            _ => Ok(()),
        }
    }

    /// The target list to remember for `source` once the server returned `saved`.
    pub fn remembered_for(&self, source: &CandidateSource, saved: &CandidateSource) -> TargetList {
        TargetList {
            source_id: source.id(),
            list_id: saved.id(),
            name: saved.name().to_string(),
            replace: self.update_type == ContentUpdateType::Replace,
        }
    }
}

/// Path of the paged candidate search for `source`.
pub(crate) fn search_paged_path(source: &CandidateSource) -> String {
    format!("{}-candidate/{}/search-paged", source.kind().tag(), source.id())
}

/// Path of a list membership operation (`merge`, `replace`, `remove`).
pub(crate) fn list_contents_path(list_id: i64, op: &str) -> String {
    format!("saved-list-candidate/{list_id}/{op}")
}

/// Path of an action addressed as `{resource}/{action}/{id}`.
pub(crate) fn action_path(source: &CandidateSource, action: &str) -> String {
    format!("{}/{action}/{}", source.kind().tag(), source.id())
}
