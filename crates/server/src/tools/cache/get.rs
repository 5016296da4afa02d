//! cache_get tool implementation.
//!
//! Retrieves the cached page of a source.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::cache::key_for;
use tcs_core::{CachedPage, CandidateSource, Error};

use crate::state::AppState;
use crate::tools::json_result;

/// Parameters for the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetParams {
    /// The source whose cached page to retrieve.
    pub source: CandidateSource,
}

/// Output from the cache_get tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CacheGetOutput {
    pub key: String,
    /// The cached page.
    pub page: CachedPage,
}

/// Implementation of the cache_get tool.
pub async fn get_impl(state: &AppState, params: CacheGetParams) -> Result<CallToolResult, McpError> {
    let key = key_for(&params.source);
    let page = state
        .cache
        .get(&params.source)
        .await
        .ok_or_else(|| Error::CacheMiss(key.clone()))?;

    json_result(&CacheGetOutput { key, page })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{list, test_state};
    use crate::tools::tests::output;

    #[tokio::test]
    async fn test_get_impl_missing() {
        let (state, _) = test_state();
        let err = get_impl(&state, CacheGetParams { source: list(7) }).await.unwrap_err();
        assert_eq!(err.code.0, -32001);
    }

    #[tokio::test]
    async fn test_get_impl_found() {
        let (state, _) = test_state();
        let source = list(7);
        {
            let screen = state.screen("default").await.unwrap();
            screen.lock().await.load(&source, Some(2), Some(10), false).await.unwrap();
        }

        let out: CacheGetOutput = output(&get_impl(&state, CacheGetParams { source }).await.unwrap());
        assert_eq!(out.key, "results/saved-list:7");
        assert_eq!(out.page.page_number, 2);
        assert_eq!(out.page.page_size, 10);
        assert_eq!(out.page.results.number, 1);
    }
}
