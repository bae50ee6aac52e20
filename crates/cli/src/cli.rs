//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Canary Splitter - Weighted random traffic splitting for event batches
#[derive(Parser, Debug)]
#[command(
    name = "canary-splitter",
    author,
    version,
    about = "Canary traffic splitter for event record batches",
    long_about = "Weighted random traffic splitting for event record batches.\n\n\
                  Routes each record of a batch to a stable or canary target \n\
                  according to a configurable percentage, dispatches it \n\
                  fire-and-forget, and reports per-record outcomes."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CANARY_SPLITTER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CANARY_SPLITTER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Route a batch of records through the splitter
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "CANARY_SPLITTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Batch input: NDJSON lines or a JSON array ("-" reads stdin)
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Load routing settings from STABLE_TARGET / CANARY_TARGET /
    /// CANARY_PERCENT environment variables instead of the config file
    #[arg(long)]
    pub from_env: bool,

    /// Override the stable target id
    #[arg(long)]
    pub stable_target: Option<String>,

    /// Override the canary target id
    #[arg(long)]
    pub canary_target: Option<String>,

    /// Override the canary traffic percentage (0 to 100)
    #[arg(long)]
    pub canary_percent: Option<f64>,

    /// Override the maximum concurrent in-flight dispatches
    #[arg(long)]
    pub max_in_flight: Option<usize>,

    /// Override the batch deadline in milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,

    /// Seed the routing randomness for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Prometheus metrics port (0 = disabled)
    #[arg(long, default_value_t = 0, env = "CANARY_SPLITTER_METRICS_PORT")]
    pub metrics_port: u16,

    /// Validate configuration and input, then exit without dispatching
    #[arg(long)]
    pub dry_run: bool,

    /// Print outcomes as JSON lines
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "CANARY_SPLITTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug, Clone)]
pub struct InfoArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "CANARY_SPLITTER_CONFIG"
    )]
    pub config: PathBuf,

    /// Output configuration info as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format choice
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogFormat {
    /// JSON structured logs
    Json,
    /// Human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_command() {
        let cli = Cli::try_parse_from([
            "canary-splitter",
            "run",
            "--config",
            "split.toml",
            "--canary-percent",
            "25",
            "--seed",
            "42",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.config, PathBuf::from("split.toml"));
                assert_eq!(args.canary_percent, Some(25.0));
                assert_eq!(args.seed, Some(42));
                assert!(!args.dry_run);
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_cli_rejects_quiet_with_verbose() {
        let result = Cli::try_parse_from(["canary-splitter", "-v", "-q", "validate"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_maps_to_observability() {
        assert!(matches!(
            observability::LogFormat::from(LogFormat::Json),
            observability::LogFormat::Json
        ));
        assert!(matches!(
            observability::LogFormat::from(LogFormat::Compact),
            observability::LogFormat::Compact
        ));
    }
}
