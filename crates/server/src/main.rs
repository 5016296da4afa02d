//! tc-sources server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tcs_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod handler;
mod state;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    if config.api_token.is_none() {
        tracing::warn!("TC_SOURCES_API_TOKEN not set; remote calls will fail until it is");
    }

    let state = state::AppState::from_config(&config).await?;

    tracing::info!(
        api = %config.api_base_url,
        persist_cache = config.persist_cache,
        "Starting tc-sources server on stdio transport"
    );

    let handler = handler::TcSourcesServer::new(Arc::new(state));
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
