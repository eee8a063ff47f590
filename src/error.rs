//! Error types for lockstep.

use thiserror::Error;

/// Result type alias using lockstep's Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for lockstep operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Validated input data is structurally inconsistent.
    ///
    /// Carries the record identifier of the offending container so the
    /// input can be located. This is the only data-level error a stage
    /// detects and reports; it aborts stage initialization.
    #[error("failed precondition for record {id}: {message}")]
    PreconditionFailed {
        /// Identifier of the container that failed validation.
        id: String,
        /// Human-readable description of the inconsistency.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid filename pattern handed to the match helper.
    #[error("invalid filename pattern: {0}")]
    Pattern(String),
}

impl Error {
    /// Create a precondition failure for the given record.
    pub fn failed_precondition(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PreconditionFailed {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Check whether this is a precondition failure.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::PreconditionFailed { .. })
    }
}
