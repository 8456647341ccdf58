//! addr-harvest command-line entry point.
//!
//! Scrapes the given targets once and prints the deduplicated findings as
//! pretty JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result, bail};
use clap::Parser;
use harvest_client::{Scraper, validate_targets};
use harvest_core::AppConfig;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Scrape pages and their same-site scripts for blockchain addresses.
#[derive(Parser, Debug)]
#[command(name = "addr-harvest", version)]
struct Cli {
    /// Target URLs (must start with http:// or https://)
    #[arg(required = true)]
    targets: Vec<String>,

    /// Overall deadline in milliseconds, at least the fetch timeout (default: config `deadline_ms`)
    #[arg(long)]
    deadline_ms: Option<u64>,

    /// Print compact JSON instead of pretty-printed
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    validate_targets(&cli.targets)?;

    let config = AppConfig::load().context("failed to load configuration")?;
    if let Some(deadline_ms) = cli.deadline_ms
        && deadline_ms < config.timeout_ms
    {
        bail!("--deadline-ms must be at least the fetch timeout ({}ms), got {}", config.timeout_ms, deadline_ms);
    }
    let deadline = cli.deadline_ms.map(Duration::from_millis).unwrap_or_else(|| config.deadline());

    let scraper = Scraper::from_config(&config)?;
    tracing::debug!("scraping {} target(s) with a {}ms deadline", cli.targets.len(), deadline.as_millis());
    let results = scraper
        .scrape_with_deadline(&cli.targets, deadline)
        .await
        .context("failed to scrape targets")?;

    let json = if cli.compact { serde_json::to_string(&results)? } else { serde_json::to_string_pretty(&results)? };
    println!("{json}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_targets() {
        let cli = Cli::try_parse_from(["addr-harvest", "https://example.com", "https://example.org"]).unwrap();
        assert_eq!(cli.targets, vec!["https://example.com", "https://example.org"]);
        assert!(cli.deadline_ms.is_none());
        assert!(!cli.compact);
    }

    #[test]
    fn test_cli_requires_a_target() {
        assert!(Cli::try_parse_from(["addr-harvest"]).is_err());
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::try_parse_from(["addr-harvest", "--deadline-ms", "5000", "--compact", "https://example.com"])
            .unwrap();
        assert_eq!(cli.deadline_ms, Some(5000));
        assert!(cli.compact);
    }
}
