//! scrape_addresses tool implementation.
//!
//! Validates the target list, runs the shared scraper under an overall
//! deadline and returns the deduplicated findings as JSON text.

use std::time::Duration;

use harvest_client::{Scraper, validate_targets};
use harvest_core::{AddressInfo, AppConfig, Error};
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for scrape_addresses tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeAddressesParams {
    /// Absolute `http://` or `https://` URLs to scrape.
    pub targets: Vec<String>,

    /// Overall deadline in milliseconds, at least the fetch timeout (default: server `deadline_ms`).
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Output structure for scrape_addresses tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ScrapeAddressesOutput {
    pub message: String,
    /// Deduplicated findings; order carries no meaning.
    pub results: Vec<AddressInfo>,
}

/// Implementation of the scrape_addresses tool.
pub async fn scrape_impl(
    scraper: &Scraper, config: &AppConfig, params: ScrapeAddressesParams,
) -> Result<CallToolResult, McpError> {
    validate_targets(&params.targets)?;

    if let Some(timeout_ms) = params.timeout_ms
        && timeout_ms < config.timeout_ms
    {
        return Err(Error::InvalidInput(format!(
            "timeout_ms must be at least the fetch timeout ({}ms), got {}",
            config.timeout_ms, timeout_ms
        ))
        .into());
    }

    let deadline = params
        .timeout_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.deadline());

    let results = scraper.scrape_with_deadline(&params.targets, deadline).await?;

    let output = ScrapeAddressesOutput { message: "Data fetched successfully".to_string(), results };

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&output).unwrap_or_default(),
    )]))
}
