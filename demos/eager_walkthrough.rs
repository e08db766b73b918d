//! Eager Walkthrough Example
//!
//! Calls each operation directly on the bundled sample data and prints the
//! results through a console sink.
//!
//! Run with: cargo run -p walkthrough_demos --bin eager_walkthrough [config.toml]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::{ReportSink, StepReport};
use dispatcher::ConsoleSink;
use ingestion::{CsvLoader, CsvOptions};
use transform::{count, describe_schema, group_and_count, inner_join, top_n, unmatched_rows};

fn main() -> Result<()> {
    observability::init()?;

    let config = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("walkthrough.toml"));
    tracing::info!(config = %config.display(), "Loading blueprint config");
    let blueprint = ConfigLoader::load_from_path(&config)?;

    // ==== Stage 1: Load ====
    let customers = CsvLoader::new(CsvOptions::try_from(&blueprint.sources.customers)?)
        .load(blueprint.sources.customers.path())
        .context("loading customers")?;
    let orders = CsvLoader::new(CsvOptions::try_from(&blueprint.sources.orders)?)
        .load(blueprint.sources.orders.path())
        .context("loading orders")?;

    let mut console = ConsoleSink::stdout("console", 10);

    // ==== Stage 2: Inspect ====
    console.write(&StepReport::schema(
        "customers_schema",
        "Customers schema",
        &describe_schema(&customers),
    ))?;
    console.write(&StepReport::schema(
        "orders_schema",
        "Orders schema",
        &describe_schema(&orders),
    ))?;
    console.write(&StepReport::count("customers_count", "Customers", count(&customers)))?;
    console.write(&StepReport::count("orders_count", "Orders", count(&orders)))?;

    // ==== Stage 3: Group ====
    let by_state = group_and_count(&customers, &["customer_state"], true)?;
    console.write(&StepReport::table(
        "customers_top_groups",
        "Top 5 customer states",
        top_n(&by_state, 5)?,
    ))?;

    let by_status = group_and_count(&orders, &["order_status"], true)?;
    console.write(&StepReport::table(
        "orders_groups",
        "Orders by status",
        by_status.into_dataset(),
    ))?;

    // ==== Stage 4: Join ====
    let joined = inner_join(&orders, &customers, "customer_id")?;
    console.write(&StepReport::count("joined_count", "Joined rows", count(&joined)))?;
    console.write(&StepReport::count(
        "unmatched_orders",
        "Orders dropped by the inner join",
        unmatched_rows(&orders, &customers, "customer_id")?,
    ))?;

    let joined_by_state = group_and_count(&joined, &["customer_state"], true)?;
    console.write(&StepReport::table(
        "joined_top_groups",
        "Top 5 states by orders",
        top_n(&joined_by_state, 5)?,
    ))?;

    console.close()?;
    Ok(())
}
