//! source_load tool implementation.
//!
//! Shows a page of a candidate source, from the cache when it can.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::{CandidateSource, Error, LoadOutcome, ReviewStatus, is_cacheable};

use crate::state::AppState;
use crate::tools::{json_result, screen_name};

/// Parameters for the source_load tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceLoadParams {
    /// Screen to load into. Each screen keeps its own paging, sort and filter state.
    #[serde(default)]
    pub screen: Option<String>,

    /// The saved search or saved list to show.
    pub source: CandidateSource,

    /// One-based page. When given, a cached page is only used if it is this page.
    #[serde(default)]
    pub page_number: Option<u32>,

    /// Page size. Defaults to the screen's current size, then the configured default.
    #[serde(default)]
    pub page_size: Option<u32>,

    /// Skip the cache and fetch from the server.
    #[serde(default)]
    pub force_refresh: bool,

    /// Review statuses to show for reviewable searches. Anything other than
    /// pending+verified is never cached.
    #[serde(default)]
    pub review_status_filter: Option<Vec<ReviewStatus>>,
}

/// Output from the source_load tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceLoadOutput {
    pub screen: String,
    /// Whether this source, with the screen's filter, may be cached.
    pub cacheable: bool,
    #[serde(flatten)]
    pub outcome: LoadOutcome,
}

/// Implementation of the source_load tool.
pub async fn load_impl(state: &AppState, params: SourceLoadParams) -> Result<CallToolResult, McpError> {
    let name = screen_name(params.screen.as_deref())?;

    if params.review_status_filter.as_ref().is_some_and(Vec::is_empty) {
        return Err(Error::InvalidInput("review_status_filter cannot be empty".into()).into());
    }

    let screen = state.screen(&name).await?;
    let mut screen = screen.lock().await;

    if let Some(filter) = params.review_status_filter {
        screen.set_review_filter(filter);
    }

    let outcome = screen
        .load(&params.source, params.page_number, params.page_size, params.force_refresh)
        .await?;

    let output =
        SourceLoadOutput { screen: name, cacheable: is_cacheable(&params.source, screen.review_filter()), outcome };
    json_result(&output)
}
