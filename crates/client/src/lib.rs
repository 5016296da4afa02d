//! Client code for tc-sources.
//!
//! This crate provides the admin REST API client used as the remote side of
//! the paged search, and the mutator that pairs each remote mutation with
//! cache invalidation.

pub mod mutate;
pub mod rest;

pub use mutate::{ListContentsOp, MutationApi, SourceMutator};
pub use rest::{
    ApiClient, ApiConfig, ApiError, ContentUpdateType, CopySourceContentsRequest, SaveSelectionRequest, StatusInfo,
    StatusUpdateRequest, UpdateCandidatesRequest,
};
