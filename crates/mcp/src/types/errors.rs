//! Error types for the adapter.

use jdbc_bridge_api::BackendError;
use rmcp::model::{ErrorCode, ErrorData};
use std::time::Duration;
use thiserror::Error;

/// JSON-RPC code used for every protocol-level failure.
pub const INTERNAL_ERROR_CODE: i32 = -32603;

/// Failures of the RPC mechanism itself, reported as error envelopes.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unsupported method: {0}")]
    UnsupportedMethod(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// JSON-RPC error code carried by the envelope.
    pub fn code(&self) -> i32 {
        INTERNAL_ERROR_CODE
    }

    /// Render as the `error` member of a response envelope.
    pub fn to_error_data(&self) -> ErrorData {
        ErrorData::new(ErrorCode(self.code()), self.to_string(), None)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(error: serde_json::Error) -> Self {
        Self::Internal(error.to_string())
    }
}

/// Errors raised while bringing up or tearing down the backend.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Failed to launch backend '{program}': {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("Backend did not become ready after {attempts} health probes")]
    NotReady { attempts: u32 },

    #[error("Failed to signal backend process group {pgid}: {reason}")]
    Signal { pgid: u32, reason: String },

    #[error("Backend did not exit within {timeout:?}")]
    ShutdownTimeout { timeout: Duration },

    #[error("Failed to reap backend process: {reason}")]
    Wait { reason: String },
}

impl SupervisorError {
    /// Create a launch failure error.
    pub fn launch_failed(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::LaunchFailed {
            program: program.into(),
            reason: reason.into(),
        }
    }
}

/// Failures that end the adapter before or while serving.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("Failed to build backend client: {0}")]
    Backend(#[from] BackendError),

    #[error("stdio transport failed: {0}")]
    Io(#[from] std::io::Error),
}
