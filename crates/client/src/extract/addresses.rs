//! Address pattern matching over raw page and script text.

use harvest_core::{AddressInfo, SourceKind};
use regex::Regex;
use std::sync::OnceLock;

static RE_ADDRESS: OnceLock<Regex> = OnceLock::new();

fn address_pattern() -> &'static Regex {
    RE_ADDRESS.get_or_init(|| Regex::new(r"0x[0-9a-fA-F]{40}").unwrap())
}

/// Find every `0x` + 40 hex digit token in `content`, left to right, without overlap.
///
/// Each match becomes one finding tagged with its source URL, kind and
/// originating target. No deduplication happens here.
pub fn extract_addresses(content: &str, src: &str, kind: SourceKind, target: &str) -> Vec<AddressInfo> {
    address_pattern()
        .find_iter(content)
        .map(|m| AddressInfo::new(m.as_str(), src, kind, target))
        .collect()
}
