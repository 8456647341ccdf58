//! Unified error types for addr-harvest.
//!
//! Every variant renders with a stable upper-case code prefix so log lines and
//! MCP error payloads can be matched on without parsing free text.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the scraping pipeline and its surfaces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty target list).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Transport-level failure (DNS, connection refused, timeout).
    #[error("FETCH_FAILED: {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Response body reached the configured byte cap.
    #[error("CONTENT_TOO_LARGE: {url} exceeds {limit} bytes")]
    ContentTooLarge { url: String, limit: usize },

    /// Base URL or reference could not be parsed.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Target hostname is on the blacklist.
    #[error("TARGET_BLACKLISTED: {0}")]
    TargetBlacklisted(String),

    /// Public-suffix lookup produced no registrable domain.
    #[error("TLD_RESOLUTION_FAILED: {0}")]
    TldResolutionFailed(String),

    /// The whole batch ran past its deadline.
    #[error("SCRAPE_TIMEOUT: {0}")]
    Timeout(String),

    /// Internal failure outside per-target handling (e.g., a panicked task).
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    pub fn fetch_failed(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::FetchFailed { url: url.into(), reason: reason.to_string() }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::FetchFailed { .. } => -32001,
            Error::ContentTooLarge { .. } => -32002,
            Error::InvalidUrl(_) => -32003,
            Error::TargetBlacklisted(_) => -32004,
            Error::TldResolutionFailed(_) => -32005,
            Error::Timeout(_) => -32006,
            Error::Internal(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::fetch_failed("https://example.com", "connection refused");
        let msg = err.to_string();
        assert!(msg.starts_with("FETCH_FAILED"));
        assert!(msg.contains("https://example.com"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn test_content_too_large_display() {
        let err = Error::ContentTooLarge { url: "https://example.com/a.js".into(), limit: 10 };
        assert_eq!(err.to_string(), "CONTENT_TOO_LARGE: https://example.com/a.js exceeds 10 bytes");
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::InvalidInput("targets cannot be empty".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32602);
        assert!(mcp_err.message.contains("targets cannot be empty"));
    }

    #[test]
    fn test_blacklisted_to_mcp_error() {
        let mcp_err: McpError = Error::TargetBlacklisted("google.com".into()).into();
        assert_eq!(mcp_err.code.0, -32004);
    }
}
