//! RoutingConfig - validated split configuration
//!
//! Constructed once per process lifetime, read-only afterwards. Invalid
//! percentages or empty target ids are configuration errors at construction
//! time, never runtime faults per record.

use crate::{ContractError, Route, TargetId};

/// Validated canary routing configuration.
///
/// Fields are private: a `RoutingConfig` value is valid by construction
/// (`canary_percent` in `[0, 100]`, both target ids non-empty).
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfig {
    stable_target: TargetId,
    canary_target: TargetId,
    canary_percent: f64,
}

impl RoutingConfig {
    /// Create a validated routing configuration
    ///
    /// # Errors
    /// - `canary_percent` outside `[0, 100]` or not finite
    /// - empty stable or canary target id
    pub fn new(
        stable_target: TargetId,
        canary_target: TargetId,
        canary_percent: f64,
    ) -> Result<Self, ContractError> {
        if !canary_percent.is_finite() || !(0.0..=100.0).contains(&canary_percent) {
            return Err(ContractError::config_validation(
                "canary_percent",
                format!("must be within [0, 100], got {canary_percent}"),
            ));
        }
        if stable_target.is_empty() {
            return Err(ContractError::config_validation(
                "stable_target",
                "target id must not be empty",
            ));
        }
        if canary_target.is_empty() {
            return Err(ContractError::config_validation(
                "canary_target",
                "target id must not be empty",
            ));
        }

        Ok(Self {
            stable_target,
            canary_target,
            canary_percent,
        })
    }

    /// The default production target
    pub fn stable_target(&self) -> &TargetId {
        &self.stable_target
    }

    /// The canary target
    pub fn canary_target(&self) -> &TargetId {
        &self.canary_target
    }

    /// Percentage of traffic routed to the canary, in `[0, 100]`
    pub fn canary_percent(&self) -> f64 {
        self.canary_percent
    }

    /// Resolve a route to its target id
    pub fn target_for(&self, route: Route) -> &TargetId {
        match route {
            Route::Stable => &self.stable_target,
            Route::Canary => &self.canary_target,
        }
    }

    /// Decide the route for one uniform sample in `[0, 100)`.
    ///
    /// Strict `<`: a sample exactly equal to `canary_percent` routes stable,
    /// so `0` never selects the canary and `100` always does.
    pub fn pick(&self, sample: f64) -> Route {
        if sample < self.canary_percent {
            Route::Canary
        } else {
            Route::Stable
        }
    }
}
