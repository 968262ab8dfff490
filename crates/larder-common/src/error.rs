//! Error types for Larder.

use thiserror::Error;

use crate::version::VersionError;

/// Top-level error type for Larder operations.
#[derive(Debug, Error)]
pub enum LarderError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Schema version could not be parsed
    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Larder operations.
pub type LarderResult<T> = Result<T, LarderError>;
