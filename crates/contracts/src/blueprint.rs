//! SplitBlueprint - Config Loader output
//!
//! Describes the complete splitter configuration: routing targets and
//! percentage, dispatch concurrency and timeouts, and the invoker backend.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{ContractError, RoutingConfig, TargetId};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete splitter configuration blueprint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Traffic split settings
    pub routing: RoutingSection,

    /// Dispatch concurrency and timeout settings
    #[serde(default)]
    pub dispatch: DispatchSection,

    /// Invocation collaborator configuration
    #[serde(default)]
    pub invoker: InvokerConfig,
}

impl SplitBlueprint {
    /// Build the validated `RoutingConfig` from the routing section
    ///
    /// # Errors
    /// Validation error when the percent is out of range or a target id is empty.
    pub fn routing_config(&self) -> Result<RoutingConfig, ContractError> {
        RoutingConfig::new(
            TargetId::new(self.routing.stable_target.clone()),
            TargetId::new(self.routing.canary_target.clone()),
            self.routing.canary_percent,
        )
    }
}

/// Traffic split settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSection {
    /// Identifier of the stable target
    pub stable_target: String,

    /// Identifier of the canary target
    pub canary_target: String,

    /// Percentage of traffic routed to the canary, 0 to 100
    #[serde(default)]
    pub canary_percent: f64,
}

/// Dispatch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSection {
    /// Maximum concurrent in-flight acceptance calls
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Per-record acceptance timeout in milliseconds
    #[serde(default = "default_accept_timeout_ms")]
    pub accept_timeout_ms: u64,

    /// Overall batch deadline in milliseconds (None = no deadline)
    #[serde(default)]
    pub batch_deadline_ms: Option<u64>,
}

fn default_max_in_flight() -> usize {
    8
}

fn default_accept_timeout_ms() -> u64 {
    3000
}

impl Default for DispatchSection {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
            accept_timeout_ms: default_accept_timeout_ms(),
            batch_deadline_ms: None,
        }
    }
}

/// Invoker backend type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvokerType {
    /// Log-only invoker (always accepts)
    #[default]
    Log,
    /// UDP fire-and-forget invoker (target id is a socket address)
    Udp,
}

/// Invoker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokerConfig {
    /// Invoker name
    pub name: String,

    /// Backend type
    #[serde(default)]
    pub invoker_type: InvokerType,

    /// Backend-specific parameters
    #[serde(default)]
    pub params: HashMap<String, String>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            name: "log".to_string(),
            invoker_type: InvokerType::Log,
            params: HashMap::new(),
        }
    }
}
