//! Layered error definitions
//!
//! Categorized by source: config / invoker / dispatch

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Invoker Errors =====
    /// Invoker creation error
    #[error("failed to create invoker '{name}': {message}")]
    InvokerCreation { name: String, message: String },

    // ===== Dispatch Errors =====
    /// Acceptance call rejected or failed in transport
    #[error("dispatch to '{target}' rejected: {message}")]
    DispatchRejected { target: String, message: String },

    /// Acceptance call did not return within the timeout
    #[error("dispatch to '{target}' timed out after {waited_ms}ms")]
    DispatchTimeout { target: String, waited_ms: u64 },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create invoker creation error
    pub fn invoker_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvokerCreation {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create dispatch rejection error
    pub fn dispatch_rejected(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::DispatchRejected {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create dispatch timeout error
    pub fn dispatch_timeout(target: impl Into<String>, waited_ms: u64) -> Self {
        Self::DispatchTimeout {
            target: target.into(),
            waited_ms,
        }
    }
}
