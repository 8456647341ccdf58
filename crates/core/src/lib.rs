//! Core types and shared functionality for addr-harvest.
//!
//! This crate provides:
//! - Fixed-capacity in-memory cache with random eviction
//! - Address findings and their deduplication
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod findings;

pub use cache::FixedSizeCache;
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use findings::{AddressInfo, SourceKind, dedup};
