//! Layered error definitions
//!
//! Categorized by source: source / schema / relational ops / config / sink

use thiserror::Error;

use crate::{DataType, JoinSide};

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Source Errors =====
    /// Source path cannot be opened or read
    #[error("source not found: {path}")]
    SourceNotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Type inference requested but there was nothing to infer from
    #[error("schema inference failed for '{path}': {message}")]
    SchemaInference { path: String, message: String },

    /// Record could not be decoded (wrong field count, invalid UTF-8, ...)
    #[error("malformed record in '{path}' at line {line}: {message}")]
    MalformedRecord {
        path: String,
        line: u64,
        message: String,
    },

    /// Field could not be parsed as its column type
    #[error("cannot parse '{value}' as {expected} for column '{column}' at line {line}")]
    ValueParse {
        column: String,
        line: u64,
        value: String,
        expected: DataType,
    },

    // ===== Relational Errors =====
    /// Join column absent from one side
    #[error("join key '{column}' missing from {side} schema")]
    JoinKeyMissing { column: String, side: JoinSide },

    /// Join column exists on both sides with different types
    #[error("join key '{column}' has type {left} on the left but {right} on the right")]
    JoinKeyTypeMismatch {
        column: String,
        left: DataType,
        right: DataType,
    },

    /// Column referenced by an operation does not exist
    #[error("column not found: '{column}' (available: {available:?})")]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Operation argument out of range
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Sink Errors =====
    /// Sink write error
    #[error("sink '{sink_name}' write error: {message}")]
    SinkWrite { sink_name: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create source-not-found error
    pub fn source_not_found(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::SourceNotFound {
            path: path.into(),
            source,
        }
    }

    /// Create schema inference error
    pub fn schema_inference(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaInference {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create malformed record error
    pub fn malformed_record(path: impl Into<String>, line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// Create join-key-missing error
    pub fn join_key_missing(column: impl Into<String>, side: JoinSide) -> Self {
        Self::JoinKeyMissing {
            column: column.into(),
            side,
        }
    }

    /// Create column-not-found error
    pub fn column_not_found<'a>(
        column: impl Into<String>,
        available: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
            available: available.into_iter().map(str::to_string).collect(),
        }
    }

    /// Create invalid parameter error
    pub fn invalid_parameter(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create sink write error
    pub fn sink_write(sink_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            sink_name: sink_name.into(),
            message: message.into(),
        }
    }
}
