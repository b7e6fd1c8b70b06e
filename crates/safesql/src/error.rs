//! Error types for safesql

use thiserror::Error;

/// Result type alias for safesql operations
pub type SqlResult<T> = Result<T, SqlError>;

/// Construction-time faults.
///
/// Rendering itself never fails: every node that made it through its
/// constructor renders to valid SQL text. These errors are raised when a
/// node or a template cannot be built in the first place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqlError {
    /// Invalid node construction (e.g. a tuple with a single operand)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Malformed `format` template or argument mismatch
    #[error("Format error: {0}")]
    Format(String),

    /// An ON condition was attached to a join tree that has no join yet
    #[error("No pending join to attach an ON condition to")]
    NoPendingJoin,
}

impl SqlError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}
