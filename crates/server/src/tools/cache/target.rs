//! target_list_get tool implementation.
//!
//! Reports the list a source's selections were last saved into.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::cache::recall_target_list;
use tcs_core::{CandidateSource, TargetList};

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the target_list_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TargetListGetParams {
    pub source: CandidateSource,
}

/// Output from the target_list_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TargetListGetOutput {
    /// None until a selection from this source has been saved.
    pub target: Option<TargetList>,
}

/// Implementation of the target_list_get tool.
pub async fn target_list_impl(state: &AppState, params: TargetListGetParams) -> Result<CallToolResult, McpError> {
    let target = recall_target_list(state.cache.store(), &params.source).await;
    json_result(&TargetListGetOutput { target })
}
