//! Address findings and cross-source deduplication.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;

/// Kind of document an address was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Html,
    Script,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Html => "html",
            SourceKind::Script => "script",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted address with its provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AddressInfo {
    /// `0x` followed by 40 hex digits, as matched.
    pub address: String,
    /// URL of the page or script the address was found in.
    pub src: String,
    /// Where in the page the address was found.
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// User-supplied targets that reached this finding, first-seen order.
    pub targets: Vec<String>,
}

impl AddressInfo {
    pub fn new(address: impl Into<String>, src: impl Into<String>, kind: SourceKind, target: impl Into<String>) -> Self {
        Self { address: address.into(), src: src.into(), kind, targets: vec![target.into()] }
    }

    fn key(&self) -> (&str, &str, SourceKind) {
        (&self.address, &self.src, self.kind)
    }
}

/// Merge findings sharing `(address, src, type)`.
///
/// The merged entry's `targets` is the union of every contributor's targets,
/// keeping first-seen order. Output order follows first occurrence of each key
/// but callers must treat the result as a set.
pub fn dedup(infos: Vec<AddressInfo>) -> Vec<AddressInfo> {
    let mut index: HashMap<(String, String, SourceKind), usize> = HashMap::with_capacity(infos.len());
    let mut unique: Vec<AddressInfo> = Vec::with_capacity(infos.len());

    for info in infos {
        let (address, src, kind) = info.key();
        let key = (address.to_string(), src.to_string(), kind);

        match index.entry(key) {
            Entry::Occupied(slot) => {
                let existing = &mut unique[*slot.get()];
                for target in info.targets {
                    if !existing.targets.contains(&target) {
                        existing.targets.push(target);
                    }
                }
            }
            Entry::Vacant(slot) => {
                let mut info = info;
                let mut seen = Vec::with_capacity(info.targets.len());
                for target in info.targets.drain(..) {
                    if !seen.contains(&target) {
                        seen.push(target);
                    }
                }
                info.targets = seen;
                slot.insert(unique.len());
                unique.push(info);
            }
        }
    }

    unique
}
