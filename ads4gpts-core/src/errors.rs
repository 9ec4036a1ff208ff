//! Error types for ads4gpts.
//!
//! Two families of failure exist. Configuration and invariant errors are
//! returned as `Err` and are expected to reach the operator. Validation and
//! transport errors are converted to data at the retrieval boundary (see
//! `ads4gpts-tools`), so they only travel as [`AdError`] for a short while
//! before becoming an `{"error": ...}` object.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for ads4gpts operations.
#[derive(Error, Debug)]
pub enum AdError {
    /// Missing or unusable configuration (e.g. no API key).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An ad request violated its field constraints.
    #[error(
        "Validation error{}: {message}",
        .field.as_ref().map(|f| format!(" on '{f}'")).unwrap_or_default()
    )]
    Validation {
        /// Offending field, if known.
        field: Option<String>,
        /// What went wrong.
        message: String,
    },

    /// The request never produced an HTTP response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The ad API answered with a non-success status.
    #[error("HTTP error: {status} {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Every retry attempt failed.
    #[error("Failed to fetch after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error of the final attempt.
        last: Box<AdError>,
    },

    /// The chat-completion collaborator failed.
    #[error("Model error: {0}")]
    Model(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using [`AdError`].
pub type Result<T> = std::result::Result<T, AdError>;

impl AdError {
    /// Create a configuration error.
    #[must_use]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error for a specific field.
    #[must_use]
    pub fn validation(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Validation {
            field: Some(field.into()),
            message: msg.into(),
        }
    }

    /// Create a validation error not tied to one field.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Validation {
            field: None,
            message: msg.into(),
        }
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create an HTTP status error.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error.
    #[must_use]
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a model error.
    #[must_use]
    pub fn model(msg: impl Into<String>) -> Self {
        Self::Model(msg.into())
    }

    /// Whether a retry could plausibly succeed.
    ///
    /// Transport failures, rate limits and server errors qualify.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status == 429 || (500..=599).contains(status),
            _ => false,
        }
    }

    /// Whether the error must escape as a hard failure instead of being
    /// converted to data.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Convert into the serializable descriptor.
    #[must_use]
    pub fn to_info(&self) -> ErrorInfo {
        ErrorInfo::new(self.to_string())
    }
}

/// The uniform `{"error": "<message>"}` shape handed back to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Human-readable message.
    pub error: String,
}

impl ErrorInfo {
    /// Create a new error descriptor.
    #[must_use]
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

impl From<&AdError> for ErrorInfo {
    fn from(err: &AdError) -> Self {
        err.to_info()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_with_field() {
        let err = AdError::validation("num_ads", "must be >= 1");
        assert_eq!(
            err.to_string(),
            "Validation error on 'num_ads': must be >= 1"
        );
    }

    #[test]
    fn test_validation_display_without_field() {
        let err = AdError::invalid("payload must be an object");
        assert_eq!(err.to_string(), "Validation error: payload must be an object");
    }

    #[test]
    fn test_http_display() {
        let err = AdError::http(403, "Forbidden");
        assert_eq!(err.to_string(), "HTTP error: 403 Forbidden");
    }

    #[test]
    fn test_retryable() {
        assert!(AdError::transport("connection refused").is_retryable());
        assert!(AdError::http(500, "boom").is_retryable());
        assert!(AdError::http(429, "slow down").is_retryable());
        assert!(!AdError::http(403, "Forbidden").is_retryable());
        assert!(!AdError::validation("id", "missing").is_retryable());
        assert!(!AdError::config("no key").is_retryable());
    }

    #[test]
    fn test_exhausted_display() {
        let err = AdError::Exhausted {
            attempts: 5,
            last: Box::new(AdError::transport("Network error")),
        };
        assert_eq!(
            err.to_string(),
            "Failed to fetch after 5 attempts: Transport error: Network error"
        );
    }

    #[test]
    fn test_fatal() {
        assert!(AdError::config("no key").is_fatal());
        assert!(!AdError::transport("reset").is_fatal());
    }

    #[test]
    fn test_error_info_serializes_as_error_object() {
        let info = AdError::transport("connection refused").to_info();
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"error": "Transport error: connection refused"})
        );
    }
}
