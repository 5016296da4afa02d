//! MCP tool implementations.
//!
//! This module contains all tools exposed by the tc-sources server.

pub mod cache;
pub mod source;

use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, Content},
};
use serde::Serialize;
use tcs_core::Error;

use crate::state::DEFAULT_SCREEN;

/// Resolve the screen a call addresses, defaulting when absent.
pub(crate) fn screen_name(screen: Option<&str>) -> Result<String, Error> {
    match screen {
        None => Ok(DEFAULT_SCREEN.to_string()),
        Some(name) if name.trim().is_empty() => Err(Error::InvalidInput("screen name cannot be blank".into())),
        Some(name) => Ok(name.trim().to_string()),
    }
}

/// Serialize a tool's output as pretty JSON text content.
pub(crate) fn json_result<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(output).map_err(Error::from)?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
