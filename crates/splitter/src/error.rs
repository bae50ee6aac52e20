//! Splitter error types

use thiserror::Error;

/// Splitter-specific errors
///
/// These cover construction-time failures only; per-record dispatch
/// failures are reported through `DispatchOutcome`, never as errors.
#[derive(Debug, Error)]
pub enum SplitterError {
    /// Invoker creation error
    #[error("failed to create invoker '{name}': {message}")]
    InvokerCreation { name: String, message: String },

    /// Contract-level error (configuration, IO)
    #[error("contract error: {0}")]
    Contract(#[from] contracts::ContractError),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SplitterError {
    /// Create an invoker creation error
    pub fn invoker_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvokerCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
