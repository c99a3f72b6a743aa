//! Error types and error handling for the wlweb service.
//!
//! This module defines the error types used throughout the
//! application. HTTP status mapping lives in the `http` adapter.

use thiserror::Error;

/// Result type alias for wlweb operations
pub type Result<T> = std::result::Result<T, WlwebError>;

/// Main error type for the wlweb service
#[derive(Error, Debug)]
pub enum WlwebError {
    #[error("Kernel failed to start: {0}")]
    KernelStartFailed(String),

    #[error("Kernel terminated: {0}")]
    KernelTerminated(String),

    #[error("Evaluation timed out after {0}s")]
    EvaluationTimeout(u64),

    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    #[error("Invalid kernel response: {0}")]
    InvalidKernelResponse(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl WlwebError {
    /// Get user-friendly error message
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Check if this is a bad request error (invalid input)
    pub fn is_bad_request(&self) -> bool {
        matches!(
            self,
            WlwebError::InvalidRequest(_) | WlwebError::ConfigError(_)
        )
    }

    /// Check if the kernel did not answer in time
    pub fn is_timeout(&self) -> bool {
        matches!(self, WlwebError::EvaluationTimeout(_))
    }

    /// Check if the kernel process is unusable and must be respawned
    pub fn is_kernel_failure(&self) -> bool {
        matches!(
            self,
            WlwebError::KernelStartFailed(_)
                | WlwebError::KernelTerminated(_)
                | WlwebError::EvaluationTimeout(_)
                | WlwebError::IoError(_)
        )
    }
}
