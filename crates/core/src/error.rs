//! Error types for sheetview.

use std::fmt;
use thiserror::Error;

/// Result type for sheetview operations.
pub type ViewResult<T> = Result<T, ViewError>;

/// Why a network request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFailure {
    /// The request did not complete within the configured timeout.
    Timeout,
    /// Connection, DNS or body transfer failure.
    Transport,
    /// The server answered with a non-success HTTP status.
    Status(u16),
}

impl fmt::Display for NetworkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timeout"),
            Self::Transport => write!(f, "transport"),
            Self::Status(code) => write!(f, "HTTP {code}"),
        }
    }
}

/// Errors that can occur in sheetview.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The remote source could not be reached or answered with an error status.
    #[error("Network error ({kind}): {message}")]
    Network {
        kind: NetworkFailure,
        message: String,
    },

    /// The remote source answered, but the payload was unusable.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Export error.
    #[error("Export error: {0}")]
    Export(String),
}

impl ViewError {
    /// Create a network error.
    pub fn network(kind: NetworkFailure, message: impl Into<String>) -> Self {
        Self::Network {
            kind,
            message: message.into(),
        }
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// True for timeouts, transport failures and error statuses.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    /// True when the request timed out.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Self::Network {
                kind: NetworkFailure::Timeout,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_display() {
        let err = ViewError::network(NetworkFailure::Status(404), "not found");
        assert_eq!(err.to_string(), "Network error (HTTP 404): not found");
        assert!(err.is_network());
        assert!(!err.is_timeout());
    }

    #[test]
    fn test_timeout_detection() {
        let err = ViewError::network(NetworkFailure::Timeout, "30s elapsed");
        assert!(err.is_timeout());
        assert_eq!(err.to_string(), "Network error (timeout): 30s elapsed");
    }

    #[test]
    fn test_protocol_error_is_not_network() {
        let err = ViewError::protocol("missing table");
        assert!(!err.is_network());
        assert_eq!(err.to_string(), "Protocol error: missing table");
    }
}
