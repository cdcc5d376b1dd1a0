//! Custom error types for soli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for soli operations
#[derive(Error, Debug)]
pub enum SoliError {
    /// Missing environment prerequisite (e.g. `HOME` unset)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key text could not be decoded into a key
    #[error("Decode error: {0}")]
    Decode(String),

    /// A key could not be encoded to text
    #[error("Encode error: {0}")]
    Encode(String),

    /// Invalid integer literal
    #[error("Parse error: {0}")]
    Parse(String),

    /// Filesystem or stream errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Unknown or missing subcommand
    #[error("Usage error: {0}")]
    Usage(String),

    /// Encryption errors from the streaming format
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Decryption errors from the streaming format
    #[error("Decryption error: {0}")]
    Decryption(String),
}

impl SoliError {
    /// Check if this is a usage error
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::Usage(_))
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Process exit status for this error
    ///
    /// Usage errors get a distinguished status so scripts can tell a bad
    /// invocation from a failed operation.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() {
            2
        } else {
            1
        }
    }
}

impl From<std::io::Error> for SoliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for SoliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(format!("Failed to serialize output: {}", err))
    }
}

/// Result type alias for soli operations
pub type SoliResult<T> = Result<T, SoliError>;
