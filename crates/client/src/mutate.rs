//! Remote mutations followed by cache invalidation.
//!
//! A mutation is sent first; only when the server accepted it are the cached
//! pages of the affected sources dropped. A failed call leaves the cache as it was.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tcs_core::cache::remember_target_list;
use tcs_core::{
    CandidateSource, Error, KeyValueStore, Mutation, SavedList, SourceKind, SourceResultCache, invalidate_after,
};

use crate::rest::{
    ApiError, CopySourceContentsRequest, SaveSelectionRequest, StatusUpdateRequest, UpdateCandidatesRequest,
};

/// Membership change applied to a saved list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListContentsOp {
    Merge,
    Replace,
    Remove,
}

impl ListContentsOp {
    pub fn path(self) -> &'static str {
        match self {
            ListContentsOp::Merge => "merge",
            ListContentsOp::Replace => "replace",
            ListContentsOp::Remove => "remove",
        }
    }

    fn mutation(self) -> Mutation {
        match self {
            ListContentsOp::Merge => Mutation::Merge,
            ListContentsOp::Replace => Mutation::Replace,
            ListContentsOp::Remove => Mutation::Remove,
        }
    }
}

/// Remote calls that change what a source shows.
#[async_trait]
pub trait MutationApi: Send + Sync {
    async fn update_list_contents(
        &self, list_id: i64, op: ListContentsOp, request: &UpdateCandidatesRequest,
    ) -> Result<(), ApiError>;

    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError>;

    async fn set_starred(&self, source: &CandidateSource, user_id: i64, starred: bool) -> Result<(), ApiError>;

    async fn set_watching(&self, source: &CandidateSource, user_id: i64, watching: bool) -> Result<(), ApiError>;

    /// Save the current selection of a search into a list, returning that list.
    async fn save_selection(
        &self, search: &CandidateSource, request: &SaveSelectionRequest,
    ) -> Result<SavedList, ApiError>;

    /// Copy a source's contents into a list, returning that list.
    async fn copy(&self, source: &CandidateSource, request: &CopySourceContentsRequest) -> Result<SavedList, ApiError>;
}

#[async_trait]
impl<T: MutationApi + ?Sized> MutationApi for Arc<T> {
    async fn update_list_contents(
        &self, list_id: i64, op: ListContentsOp, request: &UpdateCandidatesRequest,
    ) -> Result<(), ApiError> {
        (**self).update_list_contents(list_id, op, request).await
    }

    async fn update_status(&self, request: &StatusUpdateRequest) -> Result<(), ApiError> {
        (**self).update_status(request).await
    }

    async fn set_starred(&self, source: &CandidateSource, user_id: i64, starred: bool) -> Result<(), ApiError> {
        (**self).set_starred(source, user_id, starred).await
    }

    async fn set_watching(&self, source: &CandidateSource, user_id: i64, watching: bool) -> Result<(), ApiError> {
        (**self).set_watching(source, user_id, watching).await
    }

    async fn save_selection(
        &self, search: &CandidateSource, request: &SaveSelectionRequest,
    ) -> Result<SavedList, ApiError> {
        (**self).save_selection(search, request).await
    }

    async fn copy(&self, source: &CandidateSource, request: &CopySourceContentsRequest) -> Result<SavedList, ApiError> {
        (**self).copy(source, request).await
    }
}

/// Runs mutations against the API and invalidates the cache on success.
pub struct SourceMutator<A, S> {
    api: A,
    cache: Arc<SourceResultCache<S>>,
}

impl<A: MutationApi, S: KeyValueStore> SourceMutator<A, S> {
    pub fn new(api: A, cache: Arc<SourceResultCache<S>>) -> Self {
        Self { api, cache }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Merge, replace, or remove candidates of `list`.
    pub async fn update_list_contents(
        &self, list: &CandidateSource, op: ListContentsOp, request: &UpdateCandidatesRequest,
    ) -> Result<(), Error> {
        if list.kind() != SourceKind::SavedList {
            return Err(Error::InvalidInput(format!("{} needs a saved list, got {list}", op.path())));
        }
        self.api.update_list_contents(list.id(), op, request).await.map_err(mutation_error)?;
        invalidate_after(self.cache.as_ref(), &op.mutation(), list).await;
        Ok(())
    }

    /// Change the status of candidates shown by `acted_on`.
    pub async fn update_status(&self, acted_on: &CandidateSource, request: &StatusUpdateRequest) -> Result<(), Error> {
        self.api.update_status(request).await.map_err(mutation_error)?;
        invalidate_after(self.cache.as_ref(), &Mutation::StatusUpdate, acted_on).await;
        Ok(())
    }

    pub async fn set_starred(&self, source: &CandidateSource, user_id: i64, starred: bool) -> Result<(), Error> {
        self.api.set_starred(source, user_id, starred).await.map_err(mutation_error)?;
        invalidate_after(self.cache.as_ref(), &Mutation::Star, source).await;
        Ok(())
    }

    pub async fn set_watching(&self, source: &CandidateSource, user_id: i64, watching: bool) -> Result<(), Error> {
        self.api.set_watching(source, user_id, watching).await.map_err(mutation_error)?;
        invalidate_after(self.cache.as_ref(), &Mutation::Watch, source).await;
        Ok(())
    }

    /// Save a search's selection into a list.
    ///
    /// The chosen list is remembered for `search` so the next save can default to it.
    pub async fn save_selection(
        &self, search: &CandidateSource, request: &SaveSelectionRequest,
    ) -> Result<CandidateSource, Error> {
        if search.kind() != SourceKind::SavedSearch {
            return Err(Error::InvalidInput(format!("save_selection needs a saved search, got {search}")));
        }
        let target: CandidateSource = self.api.save_selection(search, request).await.map_err(mutation_error)?.into();

        invalidate_after(self.cache.as_ref(), &Mutation::SaveSelection { target: target.clone() }, search).await;

        let remembered = request.remembered_for(search, &target);
        if let Err(e) = remember_target_list(self.cache.store(), search, &remembered).await {
            tracing::warn!(source = %search, error = %e, "failed to remember target list");
        }

        Ok(target)
    }

    /// Copy a source's contents into a list.
    pub async fn copy(
        &self, source: &CandidateSource, request: &CopySourceContentsRequest,
    ) -> Result<CandidateSource, Error> {
        let target: CandidateSource = self.api.copy(source, request).await.map_err(mutation_error)?.into();
        invalidate_after(self.cache.as_ref(), &Mutation::Copy { target: target.clone() }, source).await;
        Ok(target)
    }
}

fn mutation_error(err: ApiError) -> Error {
    err.into_core(Error::MutationFailed)
}
