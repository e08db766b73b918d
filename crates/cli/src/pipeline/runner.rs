//! Pipeline runner - the fixed walkthrough sequence.
//!
//! load → describe → count → group → join → count joined → group joined.
//! Every step result is dispatched to the sinks as soon as it is produced
//! and kept in the returned `PipelineReport`.

use std::time::Instant;

use anyhow::{Context, Result};
use contracts::{Dataset, GroupOptions, SourceConfig, StepReport, WalkthroughBlueprint};
use dispatcher::ReportDispatcher;
use ingestion::{CsvLoader, CsvOptions};
use observability::StepTimings;
use tracing::{debug, info, instrument};
use transform::{count, describe_schema, group_and_count_with, join, top_n, unmatched_rows, Plan};

use super::RunStats;

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Validated walkthrough blueprint (CLI overrides already applied)
    pub blueprint: WalkthroughBlueprint,

    /// Keep the rendered plan of the final step
    pub explain: bool,
}

/// Everything a run produced
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Step reports in execution order
    pub steps: Vec<StepReport>,

    /// Rendered plan of the joined top-N step, when requested
    pub plan: Option<String>,

    pub stats: RunStats,
}

/// Runs the walkthrough against one blueprint
pub struct PipelineRunner {
    config: PipelineConfig,
}

/// What the steps produced before the sinks are closed
struct StepsOutcome {
    steps: Vec<StepReport>,
    plan: Option<String>,
    timings: StepTimings,
    customer_rows: usize,
    order_rows: usize,
    joined_rows: usize,
    unmatched_orders: usize,
}

/// Mutable state threaded through the steps
struct RunState<'a> {
    dispatcher: &'a mut ReportDispatcher,
    steps: Vec<StepReport>,
    timings: StepTimings,
}

impl RunState<'_> {
    fn timed<T>(&mut self, step: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
        let started = Instant::now();
        let value = f()?;
        self.timings.record(step, started.elapsed());
        Ok(value)
    }

    fn emit(&mut self, report: StepReport) -> Result<()> {
        debug!(step = %report.step, kind = report.kind(), "Step finished");
        self.dispatcher
            .dispatch(&report)
            .with_context(|| format!("Failed to dispatch report '{}'", report.step))?;
        self.steps.push(report);
        Ok(())
    }
}

impl PipelineRunner {
    /// Create a new runner with the given configuration
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Run every step, fail fast on the first error
    ///
    /// The sinks are flushed and closed whether or not the steps succeed.
    #[instrument(name = "pipeline_run", skip_all)]
    pub fn run(&self, dispatcher: &mut ReportDispatcher) -> Result<PipelineReport> {
        let started = Instant::now();
        let outcome = self.run_steps(dispatcher);
        let finished = dispatcher
            .finish()
            .context("Failed to close report sinks");
        let outcome = outcome?;
        finished?;

        let stats = RunStats {
            customer_rows: outcome.customer_rows,
            order_rows: outcome.order_rows,
            joined_rows: outcome.joined_rows,
            unmatched_orders: outcome.unmatched_orders,
            reports_dispatched: dispatcher.dispatched(),
            duration: started.elapsed(),
            sink_metrics: dispatcher.metrics(),
            timings: outcome.timings,
        };

        info!(
            customers = stats.customer_rows,
            orders = stats.order_rows,
            joined = stats.joined_rows,
            unmatched = stats.unmatched_orders,
            duration_ms = stats.duration.as_secs_f64() * 1000.0,
            "Walkthrough completed"
        );

        Ok(PipelineReport {
            steps: outcome.steps,
            plan: outcome.plan,
            stats,
        })
    }

    fn run_steps(&self, dispatcher: &mut ReportDispatcher) -> Result<StepsOutcome> {
        let bp = &self.config.blueprint;
        let analysis = &bp.analysis;
        let options = GroupOptions::default().with_null_keys(analysis.null_keys);

        let mut run = RunState {
            dispatcher,
            steps: Vec::new(),
            timings: StepTimings::new(),
        };

        // 1. Load
        let customers = run.timed("load_customers", || {
            load_source("customers", &bp.sources.customers)
        })?;
        let orders = run.timed("load_orders", || load_source("orders", &bp.sources.orders))?;

        // 2. Schemas
        run.emit(StepReport::schema(
            "customers_schema",
            "Customers schema",
            &describe_schema(&customers),
        ))?;
        run.emit(StepReport::schema(
            "orders_schema",
            "Orders schema",
            &describe_schema(&orders),
        ))?;

        // 3. Counts
        let customer_rows = count(&customers);
        let order_rows = count(&orders);
        run.emit(StepReport::count("customers_count", "Customers", customer_rows))?;
        run.emit(StepReport::count("orders_count", "Orders", order_rows))?;

        // 4. Customers grouped, top N
        let top_customers = run.timed("customers_top_groups", || {
            let grouped = group_and_count_with(&customers, &analysis.customer_group_by, options)
                .context("Failed to group customers")?;
            Ok(top_n(&grouped, analysis.top_n)?)
        })?;
        run.emit(StepReport::table(
            "customers_top_groups",
            format!(
                "Top {} customer groups by {}",
                analysis.top_n,
                analysis.customer_group_by.join(", ")
            ),
            top_customers,
        ))?;

        // 5. Orders grouped
        let orders_grouped = run.timed("orders_groups", || {
            Ok(group_and_count_with(&orders, &analysis.order_group_by, options)
                .context("Failed to group orders")?)
        })?;
        run.emit(StepReport::table(
            "orders_groups",
            format!("Orders by {}", analysis.order_group_by.join(", ")),
            orders_grouped.into_dataset(),
        ))?;

        // 6. Join
        let joined = run.timed("join", || {
            join(&orders, &customers, &bp.join.on, bp.join.how).with_context(|| {
                format!("Failed to join orders with customers on '{}'", bp.join.on)
            })
        })?;
        run.emit(StepReport::schema(
            "joined_schema",
            format!(
                "Orders {} join customers on {}",
                bp.join.how, bp.join.on
            ),
            &describe_schema(&joined),
        ))?;

        // 7. Joined count and unmatched orders
        let joined_rows = count(&joined);
        let unmatched_orders = unmatched_rows(&orders, &customers, &bp.join.on)?;
        run.emit(StepReport::count("joined_count", "Joined rows", joined_rows))?;
        run.emit(StepReport::count(
            "unmatched_orders",
            "Orders without a matching customer",
            unmatched_orders,
        ))?;

        // 8. Joined grouped, top N, through a deferred plan
        let plan = Plan::scan("joined", joined)
            .group_and_count(&analysis.joined_group_by, options)
            .top_n(analysis.top_n);
        let explained = self.config.explain.then(|| plan.explain());
        let top_joined = run.timed("joined_top_groups", || {
            plan.materialize().context("Failed to group joined rows")
        })?;
        run.emit(StepReport::table(
            "joined_top_groups",
            format!(
                "Top {} joined groups by {}",
                analysis.top_n,
                analysis.joined_group_by.join(", ")
            ),
            top_joined,
        ))?;

        Ok(StepsOutcome {
            steps: run.steps,
            plan: explained,
            timings: run.timings,
            customer_rows,
            order_rows,
            joined_rows,
            unmatched_orders,
        })
    }
}

/// Load one configured source
fn load_source(label: &str, source: &SourceConfig) -> Result<Dataset> {
    let options = CsvOptions::try_from(source)
        .with_context(|| format!("Invalid read options for {label}"))?;
    CsvLoader::new(options)
        .load(source.path())
        .with_context(|| format!("Failed to load {label} from {}", source.path))
}
