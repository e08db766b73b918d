//! CSV read options

use contracts::{ContractError, Field, SourceConfig};

/// Options for reading one delimited source
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// First record holds the column names
    pub has_header: bool,

    /// Infer column types; all columns are strings otherwise
    pub infer_schema: bool,

    /// Field delimiter
    pub delimiter: u8,

    /// Quote character
    pub quote: u8,

    /// Declared columns, take precedence over inference and header names
    pub columns: Option<Vec<Field>>,

    /// Number of data rows used for inference (None = all rows)
    pub sample_rows: Option<usize>,

    /// Extra tokens read as null; the empty field is always null
    pub null_values: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            infer_schema: true,
            delimiter: b',',
            quote: b'"',
            columns: None,
            sample_rows: None,
            null_values: Vec::new(),
        }
    }
}

impl CsvOptions {
    /// Options from the two flags of the basic `load` call
    pub fn new(has_header: bool, infer_schema: bool) -> Self {
        Self {
            has_header,
            infer_schema,
            ..Default::default()
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_columns(mut self, columns: Vec<Field>) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn with_sample_rows(mut self, sample_rows: usize) -> Self {
        self.sample_rows = Some(sample_rows);
        self
    }

    pub fn with_null_values(mut self, null_values: Vec<String>) -> Self {
        self.null_values = null_values;
        self
    }

    /// Whether a raw field reads as null
    pub(crate) fn is_null(&self, raw: &str) -> bool {
        raw.is_empty() || self.null_values.iter().any(|n| n == raw)
    }
}

impl TryFrom<&SourceConfig> for CsvOptions {
    type Error = ContractError;

    fn try_from(source: &SourceConfig) -> Result<Self, Self::Error> {
        let delimiter = u8::try_from(source.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ContractError::invalid_parameter(
                    "delimiter",
                    format!("'{}' is not a single-byte ASCII character", source.delimiter),
                )
            })?;

        Ok(Self {
            has_header: source.has_header,
            infer_schema: source.infer_schema,
            delimiter,
            quote: b'"',
            columns: source.columns.clone(),
            sample_rows: source.sample_rows,
            null_values: source.null_values.clone(),
        })
    }
}
