//! screen_close tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use crate::tools::{json_result, screen_name};

/// Parameters for the screen_close tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScreenCloseParams {
    /// Screen to close. Defaults to "default".
    #[serde(default)]
    pub screen: Option<String>,
}

/// Output from the screen_close tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScreenCloseOutput {
    pub screen: String,
    /// False when no screen had that name.
    pub closed: bool,
    pub open_screens: usize,
}

/// Implementation of the screen_close tool.
///
/// Forgets the screen's paging, sort and filter. Its cached pages stay.
pub async fn close_impl(state: &AppState, params: ScreenCloseParams) -> Result<CallToolResult, McpError> {
    let name = screen_name(params.screen.as_deref())?;
    let closed = state.close_screen(&name).await;
    json_result(&ScreenCloseOutput { screen: name, closed, open_screens: state.screen_count().await })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::{list, test_state};
    use crate::tools::source::load::{SourceLoadParams, load_impl};
    use crate::tools::tests::output;

    #[tokio::test]
    async fn test_close_keeps_cached_pages() {
        let (state, remote) = test_state();
        let load = || SourceLoadParams {
            screen: Some("results".into()),
            source: list(7),
            page_number: Some(1),
            page_size: Some(20),
            force_refresh: false,
            review_status_filter: None,
        };
        load_impl(&state, load()).await.unwrap();

        let params = ScreenCloseParams { screen: Some("results".into()) };
        let out: ScreenCloseOutput = output(&close_impl(&state, params).await.unwrap());
        assert!(out.closed);
        assert_eq!(out.open_screens, 0);

        load_impl(&state, load()).await.unwrap();
        assert_eq!(remote.call_count(), 1);
    }

    #[tokio::test]
    async fn test_close_unknown_screen() {
        let (state, _) = test_state();
        let out: ScreenCloseOutput = output(&close_impl(&state, ScreenCloseParams::default()).await.unwrap());
        assert_eq!(out.screen, "default");
        assert!(!out.closed);
    }
}
