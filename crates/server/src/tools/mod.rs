//! MCP tool implementations.
//!
//! This module contains all tools exposed by the addr-harvest server.
#![allow(unused_imports)]

pub mod scrape_addresses;

pub use scrape_addresses::{ScrapeAddressesOutput, ScrapeAddressesParams};
