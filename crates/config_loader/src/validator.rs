//! Configuration validation
//!
//! Validation rules:
//! - canary_percent within [0, 100]
//! - target ids non-empty and distinct
//! - max_in_flight >= 1
//! - accept_timeout_ms > 0, batch_deadline_ms > 0 when present
//! - udp invoker targets parse as socket addresses

use std::net::SocketAddr;

use contracts::{ContractError, InvokerType, SplitBlueprint};

/// Validate a SplitBlueprint
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(blueprint: &SplitBlueprint) -> Result<(), ContractError> {
    validate_routing(blueprint)?;
    validate_dispatch(blueprint)?;
    validate_invoker(blueprint)?;
    Ok(())
}

fn validate_routing(blueprint: &SplitBlueprint) -> Result<(), ContractError> {
    // RoutingConfig::new enforces the percent range and non-empty ids
    blueprint.routing_config()?;

    if blueprint.routing.stable_target == blueprint.routing.canary_target {
        return Err(ContractError::config_validation(
            "routing.canary_target",
            "stable and canary targets must be distinct",
        ));
    }
    Ok(())
}

fn validate_dispatch(blueprint: &SplitBlueprint) -> Result<(), ContractError> {
    let dispatch = &blueprint.dispatch;

    if dispatch.max_in_flight == 0 {
        return Err(ContractError::config_validation(
            "dispatch.max_in_flight",
            "must be at least 1",
        ));
    }
    if dispatch.accept_timeout_ms == 0 {
        return Err(ContractError::config_validation(
            "dispatch.accept_timeout_ms",
            "must be greater than 0",
        ));
    }
    if let Some(deadline_ms) = dispatch.batch_deadline_ms {
        if deadline_ms == 0 {
            return Err(ContractError::config_validation(
                "dispatch.batch_deadline_ms",
                "must be greater than 0 when set",
            ));
        }
    }
    Ok(())
}

fn validate_invoker(blueprint: &SplitBlueprint) -> Result<(), ContractError> {
    if blueprint.invoker.name.is_empty() {
        return Err(ContractError::config_validation(
            "invoker.name",
            "invoker name must not be empty",
        ));
    }

    if blueprint.invoker.invoker_type == InvokerType::Udp {
        // The UDP invoker resolves target ids as socket addresses at
        // dispatch time; catch unparseable ids here instead.
        for (field, target) in [
            ("routing.stable_target", &blueprint.routing.stable_target),
            ("routing.canary_target", &blueprint.routing.canary_target),
        ] {
            if target.parse::<SocketAddr>().is_err() {
                return Err(ContractError::config_validation(
                    field,
                    format!("'{target}' is not a socket address (required by udp invoker)"),
                ));
            }
        }
    }
    Ok(())
}
