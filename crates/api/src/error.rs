//! Error type for calls made against the delegate service.

use thiserror::Error;

/// Unified failure channel for every backend-directed call.
///
/// Transport errors from `reqwest` never escape this crate directly; they are
/// folded into one of these variants with a human-readable message.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("Malformed backend response: {0}")]
    MalformedResponse(String),
}

impl BackendError {
    /// Create a connection error from any displayable cause.
    pub fn connection(cause: impl std::fmt::Display) -> Self {
        Self::Connection(cause.to_string())
    }

    /// Create a remote error for a non-success status.
    pub fn remote(status: u16, message: impl Into<String>) -> Self {
        Self::Remote {
            status,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Connection(format!("request timed out: {error}"))
        } else {
            Self::connection(error)
        }
    }
}
