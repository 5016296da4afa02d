//! source_sort tool implementation.
//!
//! Sorts a screen by a column, always refetching.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tcs_core::{CandidateSource, Error};

use crate::state::AppState;
use crate::tools::source::load::SourceLoadOutput;
use crate::tools::{json_result, screen_name};

/// Parameters for the source_sort tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SourceSortParams {
    #[serde(default)]
    pub screen: Option<String>,

    pub source: CandidateSource,

    /// Column to sort by. Sorting by the current column flips the direction;
    /// a new column starts ascending.
    pub column: String,
}

/// Implementation of the source_sort tool.
pub async fn sort_impl(state: &AppState, params: SourceSortParams) -> Result<CallToolResult, McpError> {
    let name = screen_name(params.screen.as_deref())?;
    let column = params.column.trim();
    if column.is_empty() {
        return Err(Error::InvalidInput("column cannot be empty".into()).into());
    }

    let screen = state.screen(&name).await?;
    let mut screen = screen.lock().await;
    let outcome = screen.toggle_sort(&params.source, column).await?;

    let output = SourceLoadOutput {
        screen: name,
        cacheable: tcs_core::is_cacheable(&params.source, screen.review_filter()),
        outcome,
    };
    json_result(&output)
}
