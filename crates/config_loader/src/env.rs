//! Environment-based routing configuration
//!
//! The surrounding deployment configures the splitter through process
//! environment variables: `STABLE_TARGET`, `CANARY_TARGET` and
//! `CANARY_PERCENT` (0 to 100, defaults to 0 when unset).

use contracts::{ContractError, RoutingConfig, TargetId};

/// Environment variable naming the stable target
pub const STABLE_TARGET_VAR: &str = "STABLE_TARGET";
/// Environment variable naming the canary target
pub const CANARY_TARGET_VAR: &str = "CANARY_TARGET";
/// Environment variable holding the canary percentage
pub const CANARY_PERCENT_VAR: &str = "CANARY_PERCENT";

/// Load a validated `RoutingConfig` from process environment variables
///
/// # Errors
/// - missing `STABLE_TARGET` or `CANARY_TARGET`
/// - unparseable or out-of-range `CANARY_PERCENT`
pub fn load_from_env() -> Result<RoutingConfig, ContractError> {
    let stable = require_var(STABLE_TARGET_VAR)?;
    let canary = require_var(CANARY_TARGET_VAR)?;
    let percent = match std::env::var(CANARY_PERCENT_VAR) {
        Ok(raw) => parse_percent(&raw)?,
        Err(_) => 0.0,
    };

    RoutingConfig::new(TargetId::new(stable), TargetId::new(canary), percent)
}

fn require_var(name: &str) -> Result<String, ContractError> {
    std::env::var(name)
        .map_err(|_| ContractError::config_validation(name, "environment variable not set"))
}

fn parse_percent(raw: &str) -> Result<f64, ContractError> {
    raw.trim().parse::<f64>().map_err(|_| {
        ContractError::config_validation(
            CANARY_PERCENT_VAR,
            format!("'{raw}' is not a number"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("10").unwrap(), 10.0);
        assert_eq!(parse_percent(" 42.5 ").unwrap(), 42.5);
        assert!(parse_percent("ten").is_err());
    }

    // Environment variables are process-global, so every load_from_env case
    // lives in this one test to keep parallel test threads out of each
    // other's way.
    #[test]
    fn test_load_from_env() {
        std::env::remove_var(STABLE_TARGET_VAR);
        std::env::remove_var(CANARY_TARGET_VAR);
        std::env::remove_var(CANARY_PERCENT_VAR);

        // Both targets missing
        assert!(matches!(
            load_from_env(),
            Err(ContractError::ConfigValidation { .. })
        ));

        // Canary target still missing
        std::env::set_var(STABLE_TARGET_VAR, "orders-v1");
        assert!(matches!(
            load_from_env(),
            Err(ContractError::ConfigValidation { .. })
        ));

        // Percent unset defaults to 0
        std::env::set_var(CANARY_TARGET_VAR, "orders-v2");
        let config = load_from_env().unwrap();
        assert_eq!(config.stable_target().as_str(), "orders-v1");
        assert_eq!(config.canary_target().as_str(), "orders-v2");
        assert_eq!(config.canary_percent(), 0.0);

        // Explicit percent is honored
        std::env::set_var(CANARY_PERCENT_VAR, "25.5");
        assert_eq!(load_from_env().unwrap().canary_percent(), 25.5);

        // Out-of-range and unparseable values are rejected
        std::env::set_var(CANARY_PERCENT_VAR, "150");
        assert!(load_from_env().is_err());
        std::env::set_var(CANARY_PERCENT_VAR, "ten");
        assert!(load_from_env().is_err());

        std::env::remove_var(STABLE_TARGET_VAR);
        std::env::remove_var(CANARY_TARGET_VAR);
        std::env::remove_var(CANARY_PERCENT_VAR);
    }
}
