//! Step reports and the ReportSink output interface

use serde::Serialize;

use crate::{ContractError, DataType, Dataset, Field};

/// Observable result of one pipeline step
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    /// Stable step identifier (e.g. `orders_by_status`)
    pub step: String,
    /// Human-readable title
    pub title: String,
    pub outcome: StepOutcome,
}

/// What a step produced
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    /// Schema listing
    Schema { fields: Vec<Field> },
    /// Row count
    Count { rows: usize },
    /// Tabular result
    Table { dataset: Dataset },
}

impl StepReport {
    pub fn schema(
        step: impl Into<String>,
        title: impl Into<String>,
        described: &[(String, DataType)],
    ) -> Self {
        let fields = described
            .iter()
            .map(|(name, data_type)| Field::new(name.clone(), *data_type))
            .collect();
        Self {
            step: step.into(),
            title: title.into(),
            outcome: StepOutcome::Schema { fields },
        }
    }

    pub fn count(step: impl Into<String>, title: impl Into<String>, rows: usize) -> Self {
        Self {
            step: step.into(),
            title: title.into(),
            outcome: StepOutcome::Count { rows },
        }
    }

    pub fn table(step: impl Into<String>, title: impl Into<String>, dataset: Dataset) -> Self {
        Self {
            step: step.into(),
            title: title.into(),
            outcome: StepOutcome::Table { dataset },
        }
    }

    /// Short outcome label for logs
    pub fn kind(&self) -> &'static str {
        match self.outcome {
            StepOutcome::Schema { .. } => "schema",
            StepOutcome::Count { .. } => "count",
            StepOutcome::Table { .. } => "table",
        }
    }
}

/// Report output trait
///
/// All sink implementations must implement this trait.
pub trait ReportSink {
    /// Sink name (used for logging/metrics)
    fn name(&self) -> &str;

    /// Write one step report
    ///
    /// # Errors
    /// Returns write error (should include context)
    fn write(&mut self, report: &StepReport) -> Result<(), ContractError>;

    /// Flush buffer (if any)
    fn flush(&mut self) -> Result<(), ContractError>;

    /// Close sink
    fn close(&mut self) -> Result<(), ContractError>;
}
