//! Error types for pagewise
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! The three pagination failures (invalid parameter, malformed token,
//! storage unavailable) are distinct variants and are never folded into an
//! empty page.

use thiserror::Error;

/// The main error type for pagewise
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    #[error("Malformed cursor token: {message}")]
    MalformedToken { message: String },

    #[error("Storage unavailable: {message}")]
    StorageUnavailable { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors (remote bench target)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create a malformed token error
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageUnavailable {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Stable machine-readable kind, used in HTTP error bodies
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidParameter { .. } => "invalid_parameter",
            Error::MalformedToken { .. } => "malformed_token",
            Error::StorageUnavailable { .. } => "storage_unavailable",
            Error::Timeout { .. } => "timeout",
            Error::Config { .. } | Error::InvalidConfigValue { .. } | Error::YamlParse(_) => {
                "config"
            }
            Error::JsonParse(_) => "json",
            Error::Http(_) | Error::HttpStatus { .. } | Error::InvalidUrl(_) => "http",
            Error::Io(_) => "io",
            Error::Other(_) => "other",
        }
    }

    /// HTTP status code a transport should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidParameter { .. } | Error::MalformedToken { .. } => 400,
            Error::StorageUnavailable { .. } => 503,
            Error::Timeout { .. } => 504,
            _ => 500,
        }
    }

    /// Check if the caller may retry this error.
    ///
    /// The engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::StorageUnavailable { .. } | Error::Timeout { .. } | Error::Http(_) => true,
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for pagewise
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_parameter("limit", "must be between 1 and 100, got 101");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'limit': must be between 1 and 100, got 101"
        );

        let err = Error::malformed_token("not base64");
        assert_eq!(err.to_string(), "Malformed cursor token: not base64");

        let err = Error::storage("connection refused");
        assert_eq!(err.to_string(), "Storage unavailable: connection refused");
    }

    #[test]
    fn test_kind_and_status() {
        let err = Error::invalid_parameter("offset", "negative");
        assert_eq!(err.kind(), "invalid_parameter");
        assert_eq!(err.status_code(), 400);

        let err = Error::malformed_token("bad");
        assert_eq!(err.kind(), "malformed_token");
        assert_eq!(err.status_code(), 400);

        let err = Error::storage("down");
        assert_eq!(err.kind(), "storage_unavailable");
        assert_eq!(err.status_code(), 503);

        let err = Error::Timeout { timeout_ms: 10 };
        assert_eq!(err.status_code(), 504);

        assert_eq!(Error::config("x").status_code(), 500);
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::storage("down").is_retryable());
        assert!(Error::Timeout { timeout_ms: 1000 }.is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::invalid_parameter("limit", "too big").is_retryable());
        assert!(!Error::malformed_token("bad").is_retryable());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
