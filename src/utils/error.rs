//! Error types for the converter.
//!
//! Provides the per-file failure taxonomy using `thiserror` for ergonomic
//! error handling. The `Display` impl of each variant is exactly the message
//! recorded against the file in the results view.

use std::io;
use thiserror::Error;
use serde::Serialize;

/// Main error type for the converter application.
///
/// All errors in the application are converted to this type before being
/// recorded against a file or returned to the frontend.
#[derive(Error, Debug, Clone, Serialize)]
pub enum ConverterError {
    /// The destination prompt was dismissed without a selection
    #[error("Cancelled by user")]
    Cancelled,

    /// Writing the input bytes to the scratch location failed
    #[error("Staging failed: {0}")]
    Staging(String),

    /// The encoder exited non-zero; carries its stderr or a generic fallback
    #[error("{0}")]
    Encode(String),

    /// Anything outside the taxonomy above (spawn failures, poisoned state)
    #[error("Error: {0}")]
    Unexpected(String),

    /// A batch is already in flight; only ever surfaced to the command layer
    #[error("A conversion batch is already in progress")]
    BatchInProgress,
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

// Helper methods for error creation
impl ConverterError {
    pub fn staging<T: Into<String>>(msg: T) -> Self {
        Self::Staging(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn unexpected<T: Into<String>>(msg: T) -> Self {
        Self::Unexpected(msg.into())
    }
}

// Convert std::io::Error to ConverterError
impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::Unexpected(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_displays_the_results_view_message() {
        assert_eq!(ConverterError::Cancelled.to_string(), "Cancelled by user");
    }

    #[test]
    fn encode_displays_stderr_verbatim() {
        assert_eq!(ConverterError::encode("bad format").to_string(), "bad format");
    }

    #[test]
    fn unexpected_is_prefixed() {
        assert_eq!(ConverterError::unexpected("boom").to_string(), "Error: boom");
    }
}
