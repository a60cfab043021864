//! Error types for Quiet Thoughts
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Feed-facing code only ever sees three conditions: [`Error::FetchFailed`],
//! [`Error::NotFound`] and [`Error::InvalidCursor`]. Store adapters convert
//! everything else at their boundary with [`Error::into_fetch_failure`].

use thiserror::Error;

/// The main error type for Quiet Thoughts
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Feed Errors
    // ============================================================================
    #[error("Failed to fetch posts: {message}")]
    FetchFailed { message: String },

    #[error("Post '{id}' not found")]
    NotFound { id: String },

    #[error("Invalid pagination cursor: {message}")]
    InvalidCursor { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Local Storage Errors
    // ============================================================================
    #[error("Local storage error: {message}")]
    Storage { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a fetch failure
    pub fn fetch_failed(message: impl Into<String>) -> Self {
        Self::FetchFailed {
            message: message.into(),
        }
    }

    /// Create a not-found error for a post id
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
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

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a local storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Collapse any error into the feed taxonomy.
    ///
    /// `FetchFailed`, `NotFound` and `InvalidCursor` pass through untouched;
    /// everything else becomes `FetchFailed` carrying its display text.
    pub fn into_fetch_failure(self) -> Self {
        match self {
            Error::FetchFailed { .. } | Error::NotFound { .. } | Error::InvalidCursor { .. } => {
                self
            }
            other => Error::FetchFailed {
                message: other.to_string(),
            },
        }
    }

    /// Check if this error is a retryable feed failure
    ///
    /// `InvalidCursor` is reported the same way as `FetchFailed`.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Error::FetchFailed { .. } | Error::InvalidCursor { .. })
    }

    /// Check if this error means the requested post does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Human-readable message suitable for a retry affordance
    pub fn user_message(&self) -> String {
        match self {
            Error::FetchFailed { message } | Error::InvalidCursor { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type alias for Quiet Thoughts
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
        let err = Error::fetch_failed("connection reset");
        assert_eq!(err.to_string(), "Failed to fetch posts: connection reset");

        let err = Error::not_found("abc123");
        assert_eq!(err.to_string(), "Post 'abc123' not found");

        let err = Error::missing_field("project_id");
        assert_eq!(err.to_string(), "Missing required config field: project_id");

        let err = Error::http_status(503, "Unavailable");
        assert_eq!(err.to_string(), "HTTP 503: Unavailable");
    }

    #[test]
    fn test_into_fetch_failure_converts_transport_errors() {
        let err = Error::http_status(500, "boom").into_fetch_failure();
        assert!(matches!(err, Error::FetchFailed { .. }));
        assert!(err.to_string().contains("HTTP 500: boom"));

        let err = Error::Timeout { timeout_ms: 30_000 }.into_fetch_failure();
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn test_into_fetch_failure_keeps_taxonomy() {
        assert!(Error::not_found("x").into_fetch_failure().is_not_found());
        assert!(matches!(
            Error::invalid_cursor("none stored").into_fetch_failure(),
            Error::InvalidCursor { .. }
        ));
    }

    #[test]
    fn test_is_fetch_failure() {
        assert!(Error::fetch_failed("x").is_fetch_failure());
        assert!(Error::invalid_cursor("x").is_fetch_failure());
        assert!(!Error::not_found("x").is_fetch_failure());
        assert!(!Error::config("x").is_fetch_failure());
    }

    #[test]
    fn test_user_message() {
        assert_eq!(Error::fetch_failed("offline").user_message(), "offline");
        assert_eq!(
            Error::config("bad").user_message(),
            "Configuration error: bad"
        );
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
