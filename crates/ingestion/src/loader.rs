//! CSV source loader

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;

use contracts::{ContractError, DataType, Dataset, Field, Row, Schema, Value};
use csv::StringRecord;
use metrics::{counter, histogram};
use tracing::{debug, info, instrument};

use crate::config::CsvOptions;
use crate::infer::infer_column_types;

/// Load a delimited source with default options apart from the two flags.
///
/// # Errors
/// - `SourceNotFound` if the path cannot be opened or read
/// - `SchemaInference` if inference is requested but there are no data rows
pub fn load(path: &Path, has_header: bool, infer_schema: bool) -> Result<Dataset, ContractError> {
    CsvLoader::new(CsvOptions::new(has_header, infer_schema)).load(path)
}

/// Reads delimited text into a `Dataset`
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    options: CsvOptions,
}

impl CsvLoader {
    pub fn new(options: CsvOptions) -> Self {
        Self { options }
    }

    /// Load the file at `path`
    #[instrument(name = "csv_load", skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> Result<Dataset, ContractError> {
        let label = path.display().to_string();
        let file = File::open(path).map_err(|e| ContractError::source_not_found(&label, e))?;
        self.load_from_reader(BufReader::new(file), &label)
    }

    /// Load from any reader; `label` names the source in errors and metrics
    pub fn load_from_reader<R: Read>(
        &self,
        reader: R,
        label: &str,
    ) -> Result<Dataset, ContractError> {
        let start = Instant::now();

        let records = self.read_records(reader, label)?;
        let dataset = self.build_dataset(records, label)?;

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        counter!("walkthrough_rows_loaded_total", "source" => label.to_string())
            .increment(dataset.num_rows() as u64);
        histogram!("walkthrough_load_duration_ms").record(elapsed_ms);

        info!(
            source = %label,
            rows = dataset.num_rows(),
            columns = dataset.schema().len(),
            elapsed_ms = format!("{elapsed_ms:.2}"),
            "Source loaded"
        );
        Ok(dataset)
    }

    fn read_records<R: Read>(
        &self,
        reader: R,
        label: &str,
    ) -> Result<Vec<StringRecord>, ContractError> {
        // Header and field counts are handled here, not by the csv reader
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .quote(self.options.quote)
            .from_reader(reader);

        reader
            .records()
            .map(|result| result.map_err(|e| map_csv_error(e, label)))
            .collect()
    }

    fn build_dataset(
        &self,
        records: Vec<StringRecord>,
        label: &str,
    ) -> Result<Dataset, ContractError> {
        let mut records = records.into_iter();
        let header = if self.options.has_header {
            records.next()
        } else {
            None
        };
        let data: Vec<StringRecord> = records.collect();

        if self.options.has_header && header.is_none() {
            return self.empty_source(label);
        }

        let width = match (&header, &self.options.columns, data.first()) {
            (Some(h), _, _) => h.len(),
            (None, Some(cols), _) => cols.len(),
            (None, None, Some(first)) => first.len(),
            (None, None, None) => 0,
        };

        for record in &data {
            if record.len() != width {
                return Err(ContractError::malformed_record(
                    label,
                    line_of(record),
                    format!("expected {width} fields, found {}", record.len()),
                ));
            }
        }

        let fields = self.resolve_fields(header.as_ref(), &data, width, label)?;
        debug!(source = %label, ?fields, "Schema resolved");

        let rows = data
            .iter()
            .map(|record| self.convert_record(record, &fields))
            .collect::<Result<Vec<Row>, _>>()?;

        Dataset::try_new(Schema::try_new(fields)?, rows)
    }

    /// Source without a single record
    fn empty_source(&self, label: &str) -> Result<Dataset, ContractError> {
        match &self.options.columns {
            Some(cols) => Ok(Dataset::empty(Schema::try_new(cols.clone())?)),
            None if self.options.infer_schema => Err(ContractError::schema_inference(
                label,
                "source is empty, expected a header row",
            )),
            None => Ok(Dataset::empty(Schema::default())),
        }
    }

    fn resolve_fields(
        &self,
        header: Option<&StringRecord>,
        data: &[StringRecord],
        width: usize,
        label: &str,
    ) -> Result<Vec<Field>, ContractError> {
        if let Some(cols) = &self.options.columns {
            if cols.len() != width {
                return Err(ContractError::invalid_parameter(
                    "columns",
                    format!(
                        "{} columns declared but '{label}' has {width} fields per record",
                        cols.len()
                    ),
                ));
            }
            return Ok(cols.clone());
        }

        let names = column_names(header, width);

        let types = if self.options.infer_schema {
            if data.is_empty() {
                return Err(ContractError::schema_inference(
                    label,
                    "no data rows to infer column types from",
                ));
            }
            let sample_size = self.options.sample_rows.unwrap_or(data.len());
            infer_column_types(
                data.iter().take(sample_size).map(StringRecord::iter),
                width,
                |field| self.options.is_null(field),
            )
        } else {
            vec![DataType::String; width]
        };

        Ok(names
            .into_iter()
            .zip(types)
            .map(|(name, data_type)| Field::new(name, data_type))
            .collect())
    }

    fn convert_record(&self, record: &StringRecord, fields: &[Field]) -> Result<Row, ContractError> {
        let line = line_of(record);
        fields
            .iter()
            .zip(record.iter())
            .map(|(field, raw)| {
                if self.options.is_null(raw) {
                    return Ok(Value::Null);
                }
                Value::parse_as(raw, field.data_type).ok_or_else(|| ContractError::ValueParse {
                    column: field.name.clone(),
                    line,
                    value: raw.to_string(),
                    expected: field.data_type,
                })
            })
            .collect()
    }
}

/// Header names, `_c{idx}` for missing or blank ones, duplicates suffixed
fn column_names(header: Option<&StringRecord>, width: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    (0..width)
        .map(|idx| {
            let base = header
                .and_then(|h| h.get(idx))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("_c{idx}"));

            let mut name = base.clone();
            let mut suffix = 1;
            while !seen.insert(name.clone()) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            name
        })
        .collect()
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn map_csv_error(err: csv::Error, label: &str) -> ContractError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => ContractError::source_not_found(label, e),
        _ => ContractError::malformed_record(label, line, message),
    }
}
