//! `info` command implementation.

use anyhow::{Context, Result};
use contracts::{DataType, SourceConfig};
use ingestion::{CsvLoader, CsvOptions};
use serde::Serialize;
use tracing::info;

use crate::cli::InfoArgs;

/// Source info for JSON output
#[derive(Serialize)]
struct SourceInfo {
    name: String,
    path: String,
    rows: usize,
    columns: Vec<ColumnInfo>,
}

#[derive(Serialize)]
struct ColumnInfo {
    name: String,
    data_type: DataType,
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    info!(config = %args.config.display(), "Loading source schemas");

    if !args.config.exists() {
        anyhow::bail!("Configuration file not found: {}", args.config.display());
    }

    let blueprint = config_loader::ConfigLoader::load_from_path(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    let sources = vec![
        inspect_source("customers", &blueprint.sources.customers)?,
        inspect_source("orders", &blueprint.sources.orders)?,
    ];

    if args.json {
        let json =
            serde_json::to_string_pretty(&sources).context("Failed to serialize source info")?;
        println!("{}", json);
    } else {
        print_source_info(&sources);
    }

    Ok(())
}

fn inspect_source(name: &str, source: &SourceConfig) -> Result<SourceInfo> {
    let options = CsvOptions::try_from(source)
        .with_context(|| format!("Invalid read options for {name}"))?;
    let dataset = CsvLoader::new(options)
        .load(source.path())
        .with_context(|| format!("Failed to load {name} from {}", source.path))?;

    let columns = transform::describe_schema(&dataset)
        .into_iter()
        .map(|(name, data_type)| ColumnInfo { name, data_type })
        .collect();

    Ok(SourceInfo {
        name: name.to_string(),
        path: source.path.clone(),
        rows: transform::count(&dataset),
        columns,
    })
}

fn print_source_info(sources: &[SourceInfo]) {
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Walkthrough Sources                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    for source in sources {
        println!("📄 {} ({} rows)", source.name, source.rows);
        println!("   Path: {}", source.path);
        for (i, column) in source.columns.iter().enumerate() {
            let prefix = if i == source.columns.len() - 1 {
                "└─"
            } else {
                "├─"
            };
            println!("   {} {}: {}", prefix, column.name, column.data_type);
        }
        println!();
    }
}
