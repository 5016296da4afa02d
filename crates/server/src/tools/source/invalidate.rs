//! source_invalidate tool implementation.
//!
//! Drops the cached page of a source so its next load goes to the server.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::CandidateSource;
use tcs_core::cache::key_for;

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the source_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceInvalidateParams {
    pub source: CandidateSource,
}

/// Output from the source_invalidate tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceInvalidateOutput {
    /// Cache key that was cleared. Clearing a key with no entry is not an error.
    pub key: String,
}

/// Implementation of the source_invalidate tool.
pub async fn invalidate_impl(state: &AppState, params: SourceInvalidateParams) -> Result<CallToolResult, McpError> {
    state.cache.remove(&params.source).await;
    json_result(&SourceInvalidateOutput { key: key_for(&params.source) })
}
