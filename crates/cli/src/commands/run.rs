//! `run` command implementation.

use anyhow::{Context, Result};
use std::time::Instant;
use tokio::sync::watch;
use tracing::{info, warn};

use contracts::{OutcomeStatus, SplitBlueprint};
use observability::RouteStatsAggregator;
use splitter::{SeededRandom, SplitterConfig, TrafficSplitter};

use crate::batch;
use crate::cli::RunArgs;
use crate::error::CliError;
use crate::stats::RunStats;

/// Execute the `run` command
pub async fn run_route(args: &RunArgs) -> Result<()> {
    let mut blueprint = load_blueprint(args)?;
    apply_overrides(&mut blueprint, args);

    // Overrides bypass the loader, so re-validate the routing section
    let routing = blueprint
        .routing_config()
        .context("Invalid routing configuration")?;

    info!(
        stable = %routing.stable_target(),
        canary = %routing.canary_target(),
        canary_percent = routing.canary_percent(),
        invoker = %blueprint.invoker.name,
        max_in_flight = blueprint.dispatch.max_in_flight,
        "Configuration loaded"
    );

    let records = batch::read_records(&args.input).context("Failed to read batch input")?;
    info!(records = records.len(), "Batch loaded");

    if args.dry_run {
        info!("Dry run mode - configuration and input are valid, exiting");
        print_config_summary(&blueprint, records.len());
        return Ok(());
    }

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
        info!("Metrics endpoint available on port {}", args.metrics_port);
    }

    // Build the splitter
    let invoker = splitter::create_invoker(&blueprint.invoker)
        .await
        .context("Failed to create invoker")?;
    let config = SplitterConfig::from_blueprint(&blueprint);

    let traffic_splitter = match args.seed {
        Some(seed) => {
            info!(seed, "Using seeded routing randomness");
            TrafficSplitter::with_random_source(
                routing,
                invoker,
                config,
                Box::new(SeededRandom::new(seed)),
            )
        }
        None => TrafficSplitter::new(routing, invoker, config),
    };

    // Graceful shutdown: undispatched records get Cancelled outcomes
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_shutdown_signal().await;
        warn!("Received shutdown signal, cancelling undispatched records...");
        let _ = shutdown_tx.send(true);
    });

    info!("Routing batch...");
    let start = Instant::now();
    let outcomes = traffic_splitter
        .route_with_shutdown(&records, shutdown_rx)
        .await;
    let duration = start.elapsed();

    // Record metrics and aggregate
    let mut aggregator = RouteStatsAggregator::new();
    for outcome in &outcomes {
        observability::record_route_decision(outcome.route);
        observability::record_dispatch_outcome(outcome);
        aggregator.observe(outcome);
    }
    observability::record_batch_routed(outcomes.len(), duration.as_secs_f64() * 1000.0);

    // Report outcomes
    if args.json {
        for outcome in &outcomes {
            let line =
                serde_json::to_string(outcome).context("Failed to serialize outcome")?;
            println!("{}", line);
        }
    } else {
        for outcome in &outcomes {
            let status = match &outcome.status {
                OutcomeStatus::Accepted(acceptance) => {
                    format!("accepted ({})", acceptance.status_code)
                }
                OutcomeStatus::Failed { message } => format!("FAILED: {message}"),
                OutcomeStatus::Cancelled => "cancelled".to_string(),
            };
            println!(
                "  [{}] {} -> {} : {}",
                outcome.index, outcome.route, outcome.target, status
            );
        }
    }

    let stats = RunStats {
        batch_size: records.len(),
        duration,
        summary: aggregator.summary(),
    };

    if !args.json {
        stats.print_summary();
    }

    if stats.summary.failed > 0 {
        warn!(
            failed = stats.summary.failed,
            "Some records failed to dispatch"
        );
    }

    info!("Canary Splitter finished");
    Ok(())
}

/// Load the blueprint from the config file, or build one from process
/// environment variables with `--from-env`
fn load_blueprint(args: &RunArgs) -> Result<SplitBlueprint> {
    if args.from_env {
        let routing = config_loader::load_from_env()
            .context("Failed to load routing configuration from environment")?;
        return Ok(SplitBlueprint {
            version: Default::default(),
            routing: contracts::RoutingSection {
                stable_target: routing.stable_target().to_string(),
                canary_target: routing.canary_target().to_string(),
                canary_percent: routing.canary_percent(),
            },
            dispatch: Default::default(),
            invoker: Default::default(),
        });
    }

    info!(config = %args.config.display(), "Loading configuration");

    if !args.config.exists() {
        return Err(CliError::config_not_found(args.config.display().to_string()).into());
    }

    config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))
}

/// Apply CLI overrides onto the blueprint
fn apply_overrides(blueprint: &mut SplitBlueprint, args: &RunArgs) {
    if let Some(ref stable) = args.stable_target {
        info!(stable = %stable, "Overriding stable target from CLI");
        blueprint.routing.stable_target = stable.clone();
    }
    if let Some(ref canary) = args.canary_target {
        info!(canary = %canary, "Overriding canary target from CLI");
        blueprint.routing.canary_target = canary.clone();
    }
    if let Some(percent) = args.canary_percent {
        info!(percent, "Overriding canary percent from CLI");
        blueprint.routing.canary_percent = percent;
    }
    if let Some(max_in_flight) = args.max_in_flight {
        info!(max_in_flight, "Overriding max in-flight from CLI");
        blueprint.dispatch.max_in_flight = max_in_flight;
    }
    if let Some(deadline_ms) = args.deadline_ms {
        info!(deadline_ms, "Overriding batch deadline from CLI");
        blueprint.dispatch.batch_deadline_ms = Some(deadline_ms);
    }
}

fn print_config_summary(blueprint: &SplitBlueprint, records: usize) {
    println!("  Stable target: {}", blueprint.routing.stable_target);
    println!("  Canary target: {}", blueprint.routing.canary_target);
    println!("  Canary percent: {}", blueprint.routing.canary_percent);
    println!("  Invoker: {} ({:?})", blueprint.invoker.name, blueprint.invoker.invoker_type);
    println!("  Records: {}", records);
}

/// Wait for Ctrl+C or SIGTERM
async fn wait_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
