//! ConsoleSink - human-readable tables for a terminal

use std::collections::HashMap;
use std::io::{self, Stdout, Write};

use comfy_table::{Cell, ContentArrangement, Table};
use contracts::{ContractError, Dataset, Field, ReportSink, StepOutcome, StepReport};
use tracing::{debug, instrument};

const DEFAULT_PRESET: &str = "││──╞═╪╡│    ┬┴┌┐└┘";

/// Rows printed per table unless `max_rows` is configured
pub const DEFAULT_MAX_ROWS: usize = 20;

/// Sink that renders reports as tables
pub struct ConsoleSink<W: Write = Stdout> {
    name: String,
    writer: W,
    max_rows: usize,
}

impl ConsoleSink<Stdout> {
    /// Console sink on stdout
    pub fn stdout(name: impl Into<String>, max_rows: usize) -> Self {
        Self::with_writer(name, io::stdout(), max_rows)
    }

    /// Create from params map (for factory)
    ///
    /// Recognised params: `max_rows`.
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, String> {
        let max_rows = match params.get("max_rows") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| format!("invalid max_rows '{raw}': {e}"))?,
            None => DEFAULT_MAX_ROWS,
        };
        Ok(Self::stdout(name, max_rows))
    }
}

impl<W: Write> ConsoleSink<W> {
    pub fn with_writer(name: impl Into<String>, writer: W, max_rows: usize) -> Self {
        Self {
            name: name.into(),
            writer,
            max_rows,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn render(&mut self, report: &StepReport) -> io::Result<()> {
        match &report.outcome {
            StepOutcome::Count { rows } => {
                writeln!(self.writer, "{}: {}", report.title, rows)?;
            }
            StepOutcome::Schema { fields } => {
                writeln!(self.writer, "{}", report.title)?;
                writeln!(self.writer, "{}", schema_table(fields))?;
            }
            StepOutcome::Table { dataset } => {
                writeln!(self.writer, "{}", report.title)?;
                writeln!(self.writer, "{}", dataset_table(dataset, self.max_rows))?;
            }
        }
        Ok(())
    }
}

fn default_table() -> Table {
    let mut table = Table::new();
    table.load_preset(DEFAULT_PRESET);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn schema_table(fields: &[Field]) -> Table {
    let mut table = default_table();
    table.set_header(vec!["column", "type"]);
    for field in fields {
        table.add_row(vec![field.name.clone(), field.data_type.to_string()]);
    }
    table
}

fn dataset_table(dataset: &Dataset, max_rows: usize) -> Table {
    let mut table = default_table();
    let num_columns = dataset.schema().len();
    table.set_header(
        dataset
            .schema()
            .fields()
            .iter()
            .map(|f| format!("{}\n{}", f.name, f.data_type)),
    );

    let shown = dataset.num_rows().min(max_rows);
    for row in dataset.rows().iter().take(shown) {
        table.add_row(row.iter().map(Cell::new));
    }

    if shown < dataset.num_rows() && num_columns > 0 {
        let dots: Vec<_> = (0..num_columns).map(|_| Cell::new("───")).collect();
        table.add_row(dots);
        let mut footer = vec![Cell::new(format!(
            "{} rows ({} shown)",
            dataset.num_rows(),
            shown
        ))];
        footer.extend((1..num_columns).map(|_| Cell::new("")));
        table.add_row(footer);
    }
    table
}

impl<W: Write> ReportSink for ConsoleSink<W> {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(
        name = "console_sink_write",
        skip(self, report),
        fields(sink = %self.name, step = %report.step)
    )]
    fn write(&mut self, report: &StepReport) -> Result<(), ContractError> {
        self.render(report)
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn flush(&mut self) -> Result<(), ContractError> {
        self.writer
            .flush()
            .map_err(|e| ContractError::sink_write(&self.name, e.to_string()))
    }

    fn close(&mut self) -> Result<(), ContractError> {
        self.flush()?;
        debug!(sink = %self.name, "ConsoleSink closed");
        Ok(())
    }
}
