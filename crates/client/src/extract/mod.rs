//! Text-level extraction from fetched documents.
//!
//! ### Script References
//! - Parses HTML with `scraper` and collects `<script src>` values in document order.
//! - Malformed markup never aborts extraction.
//!
//! ### Addresses
//! - Regex scan for `0x` followed by exactly 40 hex digits, case-insensitive.
//! - Scripts are scanned as plain text and never executed.

pub mod addresses;
pub mod scripts;

pub use addresses::extract_addresses;
pub use scripts::extract_script_srcs;
