//! source_mutate tool implementation.
//!
//! Sends a mutation to the admin API and, once it succeeded, drops the cached
//! pages it made stale.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_client::{
    ContentUpdateType, CopySourceContentsRequest, ListContentsOp, StatusInfo, StatusUpdateRequest,
    UpdateCandidatesRequest,
};
use tcs_core::cache::key_for;
use tcs_core::{CandidateSource, Mutation};

use crate::state::AppState;
use crate::tools::json_result;

/// The list a copy or selection save writes into.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ListTarget {
    /// Existing list to write into.
    #[serde(default)]
    pub saved_list_id: Option<i64>,
    /// Name of a new list to create instead.
    #[serde(default)]
    pub new_list_name: Option<String>,
    /// Replace the list's contents instead of adding to them.
    #[serde(default)]
    pub replace: bool,
    /// Job to associate a newly created list with.
    #[serde(default)]
    pub job_id: Option<i64>,
}

impl From<ListTarget> for CopySourceContentsRequest {
    fn from(target: ListTarget) -> Self {
        Self {
            saved_list_id: target.saved_list_id,
            new_list_name: target.new_list_name,
            update_type: if target.replace { ContentUpdateType::Replace } else { ContentUpdateType::Add },
            job_id: target.job_id,
        }
    }
}

/// A mutation on a source.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MutateAction {
    /// Add candidates to a saved list.
    Merge { candidate_ids: Vec<i64> },
    /// Replace a saved list's candidates.
    Replace { candidate_ids: Vec<i64> },
    /// Remove candidates from a saved list.
    Remove { candidate_ids: Vec<i64> },
    /// Change the status of candidates shown by the source.
    StatusUpdate {
        candidate_ids: Vec<i64>,
        status: String,
        #[serde(default)]
        comment: Option<String>,
    },
    /// Star or unstar the source for a user.
    Star { user_id: i64, starred: bool },
    /// Watch or unwatch the source for a user.
    Watch { user_id: i64, watching: bool },
    /// Save the selection of a saved search into a list.
    SaveSelection { target: ListTarget },
    /// Copy the source's contents into a list.
    Copy { target: ListTarget },
}

/// Parameters for the source_mutate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceMutateParams {
    /// The source acted on.
    pub source: CandidateSource,
    pub action: MutateAction,
}

/// Output from the source_mutate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceMutateOutput {
    pub op: String,
    /// Cache keys dropped because the mutation made them stale.
    pub invalidated: Vec<String>,
    /// List written by a copy or selection save.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<CandidateSource>,
}

/// Implementation of the source_mutate tool.
pub async fn mutate_impl(state: &AppState, params: SourceMutateParams) -> Result<CallToolResult, McpError> {
    let source = &params.source;
    let mutator = &state.mutator;

    let (mutation, target) = match params.action {
        MutateAction::Merge { candidate_ids } => {
            let request = UpdateCandidatesRequest::new(candidate_ids);
            mutator.update_list_contents(source, ListContentsOp::Merge, &request).await?;
            (Mutation::Merge, None)
        }
        MutateAction::Replace { candidate_ids } => {
            let request = UpdateCandidatesRequest::new(candidate_ids);
            mutator.update_list_contents(source, ListContentsOp::Replace, &request).await?;
            (Mutation::Replace, None)
        }
        MutateAction::Remove { candidate_ids } => {
            let request = UpdateCandidatesRequest::new(candidate_ids);
            mutator.update_list_contents(source, ListContentsOp::Remove, &request).await?;
            (Mutation::Remove, None)
        }
        MutateAction::StatusUpdate { candidate_ids, status, comment } => {
            let request =
                StatusUpdateRequest { candidate_ids, info: StatusInfo { status, comment, candidate_message: None } };
            mutator.update_status(source, &request).await?;
            (Mutation::StatusUpdate, None)
        }
        MutateAction::Star { user_id, starred } => {
            mutator.set_starred(source, user_id, starred).await?;
            (Mutation::Star, None)
        }
        MutateAction::Watch { user_id, watching } => {
            mutator.set_watching(source, user_id, watching).await?;
            (Mutation::Watch, None)
        }
        MutateAction::SaveSelection { target } => {
            let saved = mutator.save_selection(source, &target.into()).await?;
            (Mutation::SaveSelection { target: saved.clone() }, Some(saved))
        }
        MutateAction::Copy { target } => {
            let copied = mutator.copy(source, &target.into()).await?;
            (Mutation::Copy { target: copied.clone() }, Some(copied))
        }
    };

    let invalidated = mutation.stale_sources(source).into_iter().map(key_for).collect();
    json_result(&SourceMutateOutput { op: mutation.name().to_string(), invalidated, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{list, search, test_state};
    use crate::tools::source::load::{SourceLoadParams, load_impl};
    use crate::tools::tests::output;
    use tcs_core::cache::recall_target_list;

    async fn load(state: &AppState, source: &CandidateSource) {
        let params = SourceLoadParams {
            screen: Some(key_for(source)),
            source: source.clone(),
            page_number: Some(1),
            page_size: Some(20),
            force_refresh: false,
            review_status_filter: None,
        };
        load_impl(state, params).await.unwrap();
    }

    #[tokio::test]
    async fn test_merge_then_load_misses() {
        let (state, remote) = test_state();
        let source = list(7);
        load(&state, &source).await;

        let params = SourceMutateParams { source: source.clone(), action: MutateAction::Merge { candidate_ids: vec![1] } };
        let out: SourceMutateOutput = output(&mutate_impl(&state, params).await.unwrap());
        assert_eq!(out.op, "merge");
        assert_eq!(out.invalidated, vec!["results/saved-list:7"]);

        load(&state, &source).await;
        assert_eq!(remote.call_count(), 2);
    }

    #[tokio::test]
    async fn test_copy_invalidates_destination() {
        let (state, _) = test_state();
        let (from, to) = (list(7), list(8));
        load(&state, &from).await;
        load(&state, &to).await;

        let action = MutateAction::Copy { target: ListTarget { saved_list_id: Some(8), ..Default::default() } };
        let out: SourceMutateOutput =
            output(&mutate_impl(&state, SourceMutateParams { source: from.clone(), action }).await.unwrap());

        assert_eq!(out.invalidated, vec!["results/saved-list:7", "results/saved-list:8"]);
        assert_eq!(out.target.map(|t| t.id()), Some(8));
        assert!(state.cache.get(&from).await.is_none());
        assert!(state.cache.get(&to).await.is_none());
    }

    #[tokio::test]
    async fn test_save_selection_remembers_target() {
        let (state, _) = test_state();
        let source = search(9, false);

        let action = MutateAction::SaveSelection {
            target: ListTarget { new_list_name: Some("Shortlist".into()), replace: true, ..Default::default() },
        };
        mutate_impl(&state, SourceMutateParams { source: source.clone(), action }).await.unwrap();

        let remembered = recall_target_list(state.cache.store(), &source).await.unwrap();
        assert_eq!(remembered.list_id, 12);
        assert!(remembered.replace);
    }

    #[tokio::test]
    async fn test_merge_into_search_rejected() {
        let (state, _) = test_state();
        let params =
            SourceMutateParams { source: search(9, false), action: MutateAction::Merge { candidate_ids: vec![1] } };
        let err = mutate_impl(&state, params).await.unwrap_err();
        assert_eq!(err.code.0, -32602);
    }

    #[test]
    fn test_action_json_shape() {
        let action: MutateAction =
            serde_json::from_str(r#"{"op":"star","user_id":3,"starred":true}"#).unwrap();
        assert!(matches!(action, MutateAction::Star { user_id: 3, starred: true }));

        let action: MutateAction =
            serde_json::from_str(r#"{"op":"copy","target":{"new_list_name":"Copy of 7"}}"#).unwrap();
        let MutateAction::Copy { target } = action else { panic!("expected copy") };
        let request = CopySourceContentsRequest::from(target);
        assert_eq!(request.update_type, ContentUpdateType::Add);
        assert_eq!(request.new_list_name.as_deref(), Some("Copy of 7"));
    }
}
