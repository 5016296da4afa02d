//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::state::AppState;
use crate::tools::cache::{
    CacheGetParams, CachePurgeParams, TargetListGetParams, clear_impl, get_impl, purge_impl, target_list_impl,
};
use crate::tools::source::{
    ScreenCloseParams, SourceInvalidateParams, SourceLoadParams, SourceMutateParams, SourceSortParams, close_impl,
    invalidate_impl, load_impl, mutate_impl, sort_impl,
};

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for tc-sources.
#[derive(Clone)]
pub struct TcSourcesServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl TcSourcesServer {
    /// Create a new server handler.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state, tool_router: Self::tool_router() }
    }

    #[tool(
        description = "Show a page of a saved search or saved list. Uses the cached page when the source is cacheable and it matches the request; otherwise fetches from the server and caches the result."
    )]
    async fn source_load(&self, params: Parameters<SourceLoadParams>) -> Result<CallToolResult, McpError> {
        load_impl(&self.state, params.0).await
    }

    #[tool(
        description = "Sort a screen by a column. The current column flips direction, a new column sorts ascending. Always fetches from the server."
    )]
    async fn source_sort(&self, params: Parameters<SourceSortParams>) -> Result<CallToolResult, McpError> {
        sort_impl(&self.state, params.0).await
    }

    #[tool(description = "Close a screen, forgetting its paging, sort and filter. Cached pages are kept.")]
    async fn screen_close(&self, params: Parameters<ScreenCloseParams>) -> Result<CallToolResult, McpError> {
        close_impl(&self.state, params.0).await
    }

    #[tool(description = "Drop the cached page of a source so the next load fetches from the server.")]
    async fn source_invalidate(&self, params: Parameters<SourceInvalidateParams>) -> Result<CallToolResult, McpError> {
        invalidate_impl(&self.state, params.0).await
    }

    /// Mutations are sent to the admin API first; cached pages are only
    /// dropped once the server accepted the change.
    #[tool(
        description = "Change a source: merge/replace/remove list candidates, update candidate status, star, watch, save a search selection into a list, or copy into a list. Invalidates the affected cached pages on success."
    )]
    async fn source_mutate(&self, params: Parameters<SourceMutateParams>) -> Result<CallToolResult, McpError> {
        mutate_impl(&self.state, params.0).await
    }

    #[tool(description = "Return the cached page of a source, or a CACHE_MISS error.")]
    async fn cache_get(&self, params: Parameters<CacheGetParams>) -> Result<CallToolResult, McpError> {
        get_impl(&self.state, params.0).await
    }

    #[tool(description = "Remove every page cached by this server and reset all screens.")]
    async fn cache_clear(&self) -> Result<CallToolResult, McpError> {
        clear_impl(&self.state).await
    }

    #[tool(description = "Delete durable cache entries not written for the given number of days.")]
    async fn cache_purge(&self, params: Parameters<CachePurgeParams>) -> Result<CallToolResult, McpError> {
        purge_impl(&self.state, params.0).await
    }

    #[tool(description = "Return the list a source's selections were last saved into, if any.")]
    async fn target_list_get(&self, params: Parameters<TargetListGetParams>) -> Result<CallToolResult, McpError> {
        target_list_impl(&self.state, params.0).await
    }
}

impl ServerHandler for TcSourcesServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "tc-sources".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
