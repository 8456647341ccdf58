//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (ADDR_HARVEST_*)
//! 2. TOML config file (if ADDR_HARVEST_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Desktop browser identity sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Hosts that are never scraped, including the service's own deployments.
pub const DEFAULT_BLACKLIST: &[&str] =
    &["google.com", "localhost:5173", "ethereum-address-scraper-api-n3j67ioglq-as.a.run.app"];

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (ADDR_HARVEST_*)
/// 2. TOML config file (if ADDR_HARVEST_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent string for HTTP requests.
    ///
    /// Set via ADDR_HARVEST_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Maximum bytes to read per response; reaching it rejects the body.
    ///
    /// Set via ADDR_HARVEST_MAX_BYTES environment variable.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via ADDR_HARVEST_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Capacity of each in-memory cache (per-target results, per-script bodies).
    ///
    /// Set via ADDR_HARVEST_CACHE_CAPACITY environment variable.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Maximum number of scripts fetched concurrently for one target.
    ///
    /// Set via ADDR_HARVEST_MAX_CONCURRENCY environment variable.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Overall deadline for one scrape call in milliseconds.
    ///
    /// Set via ADDR_HARVEST_DEADLINE_MS environment variable.
    #[serde(default = "default_deadline_ms")]
    pub deadline_ms: u64,

    /// Hostnames that must never be scraped.
    ///
    /// Set via ADDR_HARVEST_BLACKLIST_HOSTS environment variable.
    #[serde(default = "default_blacklist_hosts")]
    pub blacklist_hosts: Vec<String>,
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.into()
}

fn default_max_bytes() -> usize {
    20 * 1024 * 1024
}

fn default_timeout_ms() -> u64 {
    3_000
}

fn default_cache_capacity() -> usize {
    1_000
}

fn default_max_concurrency() -> usize {
    16
}

fn default_deadline_ms() -> u64 {
    30_000
}

fn default_blacklist_hosts() -> Vec<String> {
    DEFAULT_BLACKLIST.iter().map(|h| h.to_string()).collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            max_bytes: default_max_bytes(),
            timeout_ms: default_timeout_ms(),
            cache_capacity: default_cache_capacity(),
            max_concurrency: default_max_concurrency(),
            deadline_ms: default_deadline_ms(),
            blacklist_hosts: default_blacklist_hosts(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Overall scrape deadline as Duration.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `ADDR_HARVEST_`
    /// 2. TOML file from `ADDR_HARVEST_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("ADDR_HARVEST_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("ADDR_HARVEST_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.user_agent.starts_with("Mozilla/5.0"));
        assert_eq!(config.max_bytes, 20_971_520);
        assert_eq!(config.timeout_ms, 3_000);
        assert_eq!(config.cache_capacity, 1_000);
        assert_eq!(config.max_concurrency, 16);
        assert_eq!(config.deadline_ms, 30_000);
        assert!(config.blacklist_hosts.iter().any(|h| h == "google.com"));
        assert_eq!(config.blacklist_hosts.len(), 3);
    }

    #[test]
    fn test_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.deadline(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_from_toml_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "harvest.toml",
                r#"
                    timeout_ms = 5000
                    cache_capacity = 10
                    blacklist_hosts = ["evil.example"]
                "#,
            )?;
            jail.set_env("ADDR_HARVEST_CONFIG_FILE", "harvest.toml");

            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.timeout_ms, 5000);
            assert_eq!(config.cache_capacity, 10);
            assert_eq!(config.blacklist_hosts, vec!["evil.example".to_string()]);
            assert_eq!(config.max_bytes, 20_971_520);
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("harvest.toml", "max_concurrency = 4")?;
            jail.set_env("ADDR_HARVEST_CONFIG_FILE", "harvest.toml");
            jail.set_env("ADDR_HARVEST_MAX_CONCURRENCY", "8");

            let config = AppConfig::load().expect("config should load");
            assert_eq!(config.max_concurrency, 8);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ADDR_HARVEST_CACHE_CAPACITY", "0");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
