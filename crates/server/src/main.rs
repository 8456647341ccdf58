//! addr-harvest MCP server entry point.
//!
//! Boots the MCP server on stdio transport with one long-lived scraper, so the
//! target and script caches persist across tool calls for the process lifetime.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use harvest_client::Scraper;
use harvest_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let scraper = Scraper::from_config(&config)?;

    tracing::info!(
        cache_capacity = config.cache_capacity,
        max_concurrency = config.max_concurrency,
        "Starting addr-harvest server on stdio transport"
    );

    let handler = handler::HarvestServer::new(scraper, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
