//! Pipeline module: the fixed walkthrough sequence and its statistics.

mod runner;
mod stats;

pub use runner::{PipelineConfig, PipelineRunner};
pub use stats::RunStats;
