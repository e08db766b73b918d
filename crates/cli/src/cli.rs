//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Walkthrough - exploratory analysis over customers and orders CSV files
#[derive(Parser, Debug)]
#[command(
    name = "walkthrough",
    author,
    version,
    about = "Tabular CSV walkthrough: inspect, count, group and join",
    long_about = "Loads a customers file and an orders file, inspects their schemas,\n\
                  counts rows, groups and joins them, and prints each step.\n\n\
                  Set RUST_LOG to override the log filter."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(long, value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the walkthrough pipeline
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Show the inferred schemas of both sources
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "walkthrough.toml")]
    pub config: PathBuf,

    /// Override the customers file path from configuration
    #[arg(long)]
    pub customers: Option<PathBuf>,

    /// Override the orders file path from configuration
    #[arg(long)]
    pub orders: Option<PathBuf>,

    /// Override analysis.top_n from configuration
    #[arg(long, allow_negative_numbers = true)]
    pub top_n: Option<i64>,

    /// Emit every step as one JSON line instead of the configured sinks
    #[arg(long)]
    pub json: bool,

    /// Print the deferred plan of the final step before running it
    #[arg(long)]
    pub explain: bool,

    /// Print a Prometheus metrics snapshot at the end of the run
    #[arg(long)]
    pub metrics: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "walkthrough.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "walkthrough.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
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
