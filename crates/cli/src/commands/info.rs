//! `info` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Configuration info for JSON output
#[derive(Serialize)]
struct ConfigInfo {
    version: String,
    routing: RoutingInfo,
    dispatch: DispatchInfo,
    invoker: InvokerInfo,
}

#[derive(Serialize)]
struct RoutingInfo {
    stable_target: String,
    canary_target: String,
    canary_percent: f64,
}

#[derive(Serialize)]
struct DispatchInfo {
    max_in_flight: usize,
    accept_timeout_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    batch_deadline_ms: Option<u64>,
}

#[derive(Serialize)]
struct InvokerInfo {
    name: String,
    invoker_type: String,
    #[serde(skip_serializing_if = "std::collections::HashMap::is_empty")]
    params: std::collections::HashMap<String, String>,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration info");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    if args.json {
        let info = build_config_info(&blueprint);
        let json =
            serde_json::to_string_pretty(&info).context("Failed to serialize config info")?;
        println!("{}", json);
    } else {
        print_config_info(&blueprint);
    }

    Ok(())
}

fn build_config_info(blueprint: &contracts::SplitBlueprint) -> ConfigInfo {
    ConfigInfo {
        version: format!("{:?}", blueprint.version),
        routing: RoutingInfo {
            stable_target: blueprint.routing.stable_target.clone(),
            canary_target: blueprint.routing.canary_target.clone(),
            canary_percent: blueprint.routing.canary_percent,
        },
        dispatch: DispatchInfo {
            max_in_flight: blueprint.dispatch.max_in_flight,
            accept_timeout_ms: blueprint.dispatch.accept_timeout_ms,
            batch_deadline_ms: blueprint.dispatch.batch_deadline_ms,
        },
        invoker: InvokerInfo {
            name: blueprint.invoker.name.clone(),
            invoker_type: format!("{:?}", blueprint.invoker.invoker_type),
            params: blueprint.invoker.params.clone(),
        },
    }
}

fn print_config_info(blueprint: &contracts::SplitBlueprint) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Canary Splitter Configuration                   ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    // Routing
    println!("🔀 Routing");
    println!("   ├─ Version: {:?}", blueprint.version);
    println!("   ├─ Stable target: {}", blueprint.routing.stable_target);
    println!("   ├─ Canary target: {}", blueprint.routing.canary_target);
    println!(
        "   └─ Canary percent: {}%",
        blueprint.routing.canary_percent
    );

    // Dispatch
    println!("\n⚙️  Dispatch");
    println!("   ├─ Max in-flight: {}", blueprint.dispatch.max_in_flight);
    println!(
        "   ├─ Accept timeout: {} ms",
        blueprint.dispatch.accept_timeout_ms
    );
    match blueprint.dispatch.batch_deadline_ms {
        Some(deadline) => println!("   └─ Batch deadline: {} ms", deadline),
        None => println!("   └─ Batch deadline: (none)"),
    }

    // Invoker
    println!("\n📤 Invoker");
    println!("   ├─ Name: {}", blueprint.invoker.name);
    if blueprint.invoker.params.is_empty() {
        println!("   └─ Type: {:?}", blueprint.invoker.invoker_type);
    } else {
        println!("   ├─ Type: {:?}", blueprint.invoker.invoker_type);
        let count = blueprint.invoker.params.len();
        for (i, (key, value)) in blueprint.invoker.params.iter().enumerate() {
            let prefix = if i == count - 1 { "└─" } else { "├─" };
            println!("   {} {}: {}", prefix, key, value);
        }
    }

    println!();
}
