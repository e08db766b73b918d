//! LogSink - logs report summaries via tracing

use contracts::{ContractError, ReportSink, StepOutcome, StepReport};
use tracing::{info, instrument};

/// Sink that logs one event per report
pub struct LogSink {
    name: String,
}

impl LogSink {
    /// Create a new LogSink with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn log_report_summary(&self, report: &StepReport) {
        let (rows, columns) = match &report.outcome {
            StepOutcome::Count { rows } => (*rows, 0),
            StepOutcome::Schema { fields } => (0, fields.len()),
            StepOutcome::Table { dataset } => (dataset.num_rows(), dataset.schema().len()),
        };

        info!(
            sink = %self.name,
            step = %report.step,
            kind = report.kind(),
            rows,
            columns,
            "{}",
            report.title
        );
    }
}

impl ReportSink for LogSink {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "log_sink_write",
        skip(self, report),
        fields(sink = %self.name, step = %report.step)
    )]
    fn write(&mut self, report: &StepReport) -> Result<(), ContractError> {
        self.log_report_summary(report);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        // Nothing to flush for log sink
        Ok(())
    }

    #[instrument(name = "log_sink_close", skip(self))]
    fn close(&mut self) -> Result<(), ContractError> {
        info!(sink = %self.name, "LogSink closed");
        Ok(())
    }
}
