//! `run` command implementation.

use anyhow::{Context, Result};
use dispatcher::{create_dispatcher, JsonSink, ReportDispatcher};
use tracing::info;

use crate::cli::RunArgs;
use crate::pipeline::{PipelineConfig, PipelineRunner};

/// Execute the `run` command
pub fn run_pipeline(args: &RunArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading configuration");

    // Validate config path
    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    // Load and parse configuration
    let mut blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Apply CLI overrides
    if let Some(ref path) = args.customers {
        info!(path = %path.display(), "Overriding customers source from CLI");
        blueprint.sources.customers.path = path.display().to_string();
    }
    if let Some(ref path) = args.orders {
        info!(path = %path.display(), "Overriding orders source from CLI");
        blueprint.sources.orders.path = path.display().to_string();
    }
    if let Some(top_n) = args.top_n {
        info!(top_n, "Overriding analysis.top_n from CLI");
        blueprint.analysis.top_n = top_n;
    }
    // Overrides go through the same rules as the file
    config_loader::validate(&blueprint).context("Invalid command-line override")?;

    info!(
        customers = %blueprint.sources.customers.path,
        orders = %blueprint.sources.orders.path,
        join_on = %blueprint.join.on,
        join_how = %blueprint.join.how,
        sinks = blueprint.sinks.len(),
        "Configuration loaded"
    );

    let metrics_handle = if args.metrics {
        Some(observability::install_metrics_recorder()?)
    } else {
        None
    };

    let mut dispatcher = if args.json {
        ReportDispatcher::new().with_sink(Box::new(JsonSink::stdout("json")))
    } else {
        create_dispatcher(&blueprint.sinks).context("Failed to create report sinks")?
    };

    let runner = PipelineRunner::new(PipelineConfig {
        blueprint,
        explain: args.explain,
    });
    let report = runner
        .run(&mut dispatcher)
        .context("Walkthrough pipeline failed")?;

    // stdout carries JSON lines only in --json mode
    if !args.json {
        if let Some(ref plan) = report.plan {
            println!("Plan for joined_top_groups:\n{plan}");
        }
        report.stats.print_summary();
    } else if let Some(ref plan) = report.plan {
        info!(plan = %plan, "Plan for joined_top_groups");
    }

    if let Some(handle) = metrics_handle {
        if args.json {
            eprintln!("{}", handle.render());
        } else {
            println!("{}", handle.render());
        }
    }

    info!(
        steps = report.steps.len(),
        duration_secs = report.stats.duration.as_secs_f64(),
        "Walkthrough finished"
    );
    Ok(())
}
