//! JsonSink - one JSON object per report

use std::io::{self, Stdout, Write};

use contracts::{ContractError, ReportSink, StepReport};
use tracing::{debug, instrument};

/// Sink that writes each report as a JSON line
pub struct JsonSink<W: Write = Stdout> {
    name: String,
    writer: W,
}

impl JsonSink<Stdout> {
    pub fn stdout(name: impl Into<String>) -> Self {
        Self::with_writer(name, io::stdout())
    }
}

impl<W: Write> JsonSink<W> {
    pub fn with_writer(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line(&mut self, report: &StepReport) -> Result<(), ContractError> {
        serde_json::to_writer(&mut self.writer, report)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }
}

impl<W: Write> ReportSink for JsonSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "json_sink_write",
        skip(self, report),
        fields(sink = %self.name, step = %report.step)
    )]
    fn write(&mut self, report: &StepReport) -> Result<(), ContractError> {
        self.write_line(report)
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn close(&mut self) -> Result<(), ContractError> {
        self.flush()?;
        debug!(sink = %self.name, "JsonSink closed");
        Ok(())
    }
}
