//! `validate` command implementation.

use anyhow::{Context, Result};
use contracts::{SinkType, WalkthroughBlueprint};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    customers: String,
    orders: String,
    join: String,
    top_n: i64,
    sink_count: usize,
}

/// Execute the `validate` command
pub fn run_validate(args: &ValidateArgs) -> Result<()> {
    info!(config = %args.config.display(), "Validating configuration");

    let result = validate_config(args);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(args: &ValidateArgs) -> ValidationResult {
    let config_path = args.config.display().to_string();

    // Check file exists
    if !args.config.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", args.config.display())),
            warnings: None,
            summary: None,
        };
    }

    // Try to load and validate
    match config_loader::ConfigLoader::load_from_path(&args.config) {
        Ok(blueprint) => {
            let warnings = collect_warnings(&blueprint);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", blueprint.version),
                    customers: blueprint.sources.customers.path.clone(),
                    orders: blueprint.sources.orders.path.clone(),
                    join: format!("{} on {}", blueprint.join.how, blueprint.join.on),
                    top_n: blueprint.analysis.top_n,
                    sink_count: blueprint.sinks.len(),
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(blueprint: &WalkthroughBlueprint) -> Vec<String> {
    let mut warnings = Vec::new();

    if blueprint.sinks.is_empty() {
        warnings.push("No sinks configured - step results will not be shown".to_string());
    }

    for (label, source) in [
        ("customers", &blueprint.sources.customers),
        ("orders", &blueprint.sources.orders),
    ] {
        if !source.path().exists() {
            warnings.push(format!("{label} source '{}' does not exist yet", source.path));
        }
    }

    if blueprint.analysis.top_n == 0 {
        warnings.push("analysis.top_n is 0 - top-N tables will be empty".to_string());
    }

    // Log sinks write to stderr; only console sinks compete for stdout
    let has_sink = |kind: SinkType| blueprint.sinks.iter().any(|s| s.sink_type == kind);
    if has_sink(SinkType::Json) && has_sink(SinkType::Console) {
        warnings.push("json sink shares stdout with a console sink".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Customers: {}", summary.customers);
            println!("  Orders: {}", summary.orders);
            println!("  Join: {}", summary.join);
            println!("  Top N: {}", summary.top_n);
            println!("  Sinks: {}", summary.sink_count);
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
