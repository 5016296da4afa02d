//! cache_purge tool implementation.
//!
//! Purges durable store entries by age.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::Error;

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeParams {
    /// Purge entries not written for this many days.
    pub older_than_days: i64,
}

/// Output from the cache_purge tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CachePurgeOutput {
    /// Number of entries deleted.
    pub deleted: u64,
    /// False when the cache is in memory; nothing outlives the process there.
    pub durable: bool,
}

/// Implementation of the cache_purge tool.
pub async fn purge_impl(state: &AppState, params: CachePurgeParams) -> Result<CallToolResult, McpError> {
    if params.older_than_days < 0 {
        return Err(Error::InvalidInput("older_than_days must not be negative".into()).into());
    }

    let output = match &state.durable {
        Some(db) => CachePurgeOutput { deleted: db.purge_older_than(params.older_than_days).await?, durable: true },
        None => CachePurgeOutput { deleted: 0, durable: false },
    };

    json_result(&output)
}
