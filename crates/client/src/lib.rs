//! Client code for addr-harvest.
//!
//! This crate provides the bounded HTTP fetch, script discovery, same-site
//! filtering, address extraction and the scrape orchestrator shared by the
//! server and CLI.

pub mod extract;
pub mod fetch;
pub mod scrape;

pub use extract::{extract_addresses, extract_script_srcs};

pub use fetch::{
    DomainFilter, FetchClient, FetchConfig, Fetcher, ScriptGate, registrable_domain, resolve_reference,
    same_registrable_domain, validate_targets,
};

pub use scrape::{ScrapeCaches, Scraper};
