//! Run statistics.

use std::time::Duration;

use dispatcher::MetricsSnapshot;
use observability::StepTimings;

/// Statistics from a pipeline run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Rows loaded from the customers source
    pub customer_rows: usize,

    /// Rows loaded from the orders source
    pub order_rows: usize,

    /// Rows produced by the join
    pub joined_rows: usize,

    /// Orders whose join key matched no customer
    pub unmatched_orders: usize,

    /// Reports sent to the dispatcher
    pub reports_dispatched: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Per-step durations
    pub timings: StepTimings,

    /// Write/failure counters per sink
    pub sink_metrics: Vec<(String, MetricsSnapshot)>,
}

impl RunStats {
    /// Share of orders that found a customer, as a percentage
    pub fn match_rate(&self) -> f64 {
        if self.order_rows > 0 {
            (self.order_rows - self.unmatched_orders) as f64 / self.order_rows as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                    Walkthrough Statistics                    ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        println!("📊 Overview");
        println!("   ├─ Duration: {:.3}s", self.duration.as_secs_f64());
        println!("   ├─ Customers: {}", self.customer_rows);
        println!("   ├─ Orders: {}", self.order_rows);
        println!("   ├─ Joined rows: {}", self.joined_rows);
        println!(
            "   ├─ Unmatched orders: {} ({:.2}% matched)",
            self.unmatched_orders,
            self.match_rate()
        );
        println!("   └─ Reports dispatched: {}", self.reports_dispatched);

        if !self.timings.is_empty() {
            println!("\n⏱  Step Timings");
            let last = self.timings.len() - 1;
            for (i, (step, ms)) in self.timings.steps().iter().enumerate() {
                let prefix = if i == last { "└─" } else { "├─" };
                println!("   {} {:<24} {:>10.3} ms", prefix, step, ms);
            }
            println!("   Per step: {}", self.timings.summary());
        }

        if !self.sink_metrics.is_empty() {
            println!("\n📤 Sinks");
            for (i, (name, snapshot)) in self.sink_metrics.iter().enumerate() {
                let prefix = if i == self.sink_metrics.len() - 1 {
                    "└─"
                } else {
                    "├─"
                };
                println!(
                    "   {} {}: {} written, {} failed",
                    prefix, name, snapshot.write_count, snapshot.failure_count
                );
            }
        }

        println!();
    }
}
