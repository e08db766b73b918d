//! Deferred Plan Example
//!
//! Builds the "orders per customer state" question as a plan, prints the
//! plan, then materializes it.
//!
//! Run with: cargo run -p walkthrough_demos --bin plan_walkthrough

use std::path::Path;

use anyhow::Result;
use contracts::{JoinKind, NullKeyPolicy, ReportSink, StepReport};
use dispatcher::ConsoleSink;
use transform::{GroupOptions, Plan};

fn main() -> Result<()> {
    observability::init()?;

    let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
    let customers = ingestion::load(&data.join("customers.csv"), true, true)?;
    let orders = ingestion::load(&data.join("orders.csv"), true, true)?;

    let options = GroupOptions::default().with_null_keys(NullKeyPolicy::Drop);
    let plan = Plan::scan("orders", orders)
        .join(Plan::scan("customers", customers), "customer_id", JoinKind::Left)
        .group_and_count(&["customer_state"], options)
        .top_n(3);

    println!("{}", plan.explain());

    let top = plan.materialize()?;
    let mut console = ConsoleSink::stdout("console", 10);
    console.write(&StepReport::table(
        "joined_top_groups",
        "Top 3 states (left join, unmatched orders dropped from grouping)",
        top,
    ))?;
    console.close()?;
    Ok(())
}
