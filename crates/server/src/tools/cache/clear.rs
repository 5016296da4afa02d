//! cache_clear tool implementation.
//!
//! Drops every page this process cached and resets all screens.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tools::json_result;

/// Output from the cache_clear tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheClearOutput {
    /// Number of cache entries removed.
    pub cleared: usize,
}

/// Implementation of the cache_clear tool.
pub async fn clear_impl(state: &AppState) -> Result<CallToolResult, McpError> {
    let cleared = state.clear().await;
    tracing::info!(cleared, "cleared result cache");
    json_result(&CacheClearOutput { cleared })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{list, test_state};
    use crate::tools::tests::output;

    #[tokio::test]
    async fn test_clear_counts_written_entries() {
        let (state, _) = test_state();
        for id in [7, 8] {
            let screen = state.screen(&format!("s{id}")).await.unwrap();
            screen.lock().await.load(&list(id), None, None, false).await.unwrap();
        }

        let out: CacheClearOutput = output(&clear_impl(&state).await.unwrap());
        assert_eq!(out.cleared, 2);
        assert!(state.cache.get(&list(7)).await.is_none());

        let out: CacheClearOutput = output(&clear_impl(&state).await.unwrap());
        assert_eq!(out.cleared, 0);
    }
}
