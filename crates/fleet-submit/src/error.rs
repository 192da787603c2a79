//! Error types for talking to the import service.

use thiserror::Error;

/// Failure of one request to the import service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum TransportError {
    /// Could not establish a connection; the request never reached the server.
    #[error("connection failed: {0}")]
    Connect(String),

    /// No response within the configured timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Any other transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The client could not be constructed.
    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl TransportError {
    /// Returns a user-friendly error message suitable for display in the UI.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Connect(_) | Self::Network(_) => {
                "Could not reach the import service. Please check your connection."
            }
            Self::Timeout(_) => {
                "The import service did not answer in time. Some rows may have been saved; check before retrying."
            }
            Self::Status { status, .. } if *status >= 500 => {
                "The import service failed. Please try again later."
            }
            Self::Status { .. } => "The import service rejected the request.",
            Self::Malformed(_) => "The import service sent an unexpected response.",
            Self::Config(_) => "The import client is misconfigured.",
        }
    }

    /// Whether resending the same request cannot duplicate data.
    ///
    /// Only failures where the server certainly did not process the request
    /// qualify: refused connections and gateway errors. Timeouts do not,
    /// since the server may have committed before the response was lost.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connect(_) => true,
            Self::Status { status, .. } => matches!(status, 502..=504),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Connect(err.to_string())
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if err.is_builder() {
            Self::Config(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable() {
        assert!(TransportError::Connect("refused".to_string()).is_retryable());
        assert!(
            TransportError::Status {
                status: 503,
                message: "unavailable".to_string()
            }
            .is_retryable()
        );
        assert!(!TransportError::Timeout("60s".to_string()).is_retryable());
        assert!(
            !TransportError::Status {
                status: 500,
                message: "boom".to_string()
            }
            .is_retryable()
        );
        assert!(!TransportError::Malformed("eof".to_string()).is_retryable());
    }

    #[test]
    fn test_user_messages() {
        let err = TransportError::Timeout("60s".to_string());
        assert!(err.user_message().contains("check before retrying"));
        let err = TransportError::Status {
            status: 422,
            message: String::new(),
        };
        assert!(err.user_message().contains("rejected"));
    }
}
