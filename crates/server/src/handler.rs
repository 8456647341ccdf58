//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::scrape_addresses::{ScrapeAddressesParams, scrape_impl};

use harvest_client::Scraper;
use harvest_core::AppConfig;
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

/// The main MCP server handler for addr-harvest.
#[derive(Clone)]
pub struct HarvestServer {
    tool_router: ToolRouter<Self>,
    scraper: Scraper,
    config: Arc<AppConfig>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl HarvestServer {
    /// Create a new server handler around a shared scraper.
    pub fn new(scraper: Scraper, config: AppConfig) -> Self {
        Self { tool_router: Self::tool_router(), scraper, config: Arc::new(config) }
    }

    /// Scrape target pages and their same-site scripts for blockchain addresses.
    #[tool(
        description = "Scrape target pages and their same-site scripts for 0x-prefixed 40-hex-digit addresses. \
                       Returns deduplicated findings tagged with source URL, type (html/script) and originating targets."
    )]
    async fn scrape_addresses(&self, params: Parameters<ScrapeAddressesParams>) -> Result<CallToolResult, McpError> {
        scrape_impl(&self.scraper, &self.config, params.0).await
    }
}

impl ServerHandler for HarvestServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "addr-harvest".into(),
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
