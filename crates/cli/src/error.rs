//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Batch input parsing error
    #[error("Failed to parse batch input at record {index}: {message}")]
    InputParse { index: usize, message: String },

    /// Batch input is not NDJSON or a JSON array
    #[error("Unrecognized batch input format: {message}")]
    InputFormat { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn input_parse(index: usize, message: impl Into<String>) -> Self {
        Self::InputParse {
            index,
            message: message.into(),
        }
    }

    pub fn input_format(message: impl Into<String>) -> Self {
        Self::InputFormat {
            message: message.into(),
        }
    }
}
