//! # Ingestion
//!
//! Delimited-text loading.
//!
//! Responsibilities:
//! - Read a CSV source into an immutable `Dataset`
//! - Header handling (`_c0`, `_c1`, ... when there is none)
//! - Column type inference or declared schemas
//! - Typed errors for missing sources, empty samples and malformed records
//!
//! ## Usage Example
//!
//! ```no_run
//! use ingestion::{CsvLoader, CsvOptions};
//! use std::path::Path;
//!
//! let loader = CsvLoader::new(CsvOptions::default());
//! let orders = loader.load(Path::new("data/orders.csv")).unwrap();
//! println!("{} rows", orders.num_rows());
//! ```

mod config;
mod infer;
mod loader;

// Re-exports
pub use config::CsvOptions;
pub use contracts::Dataset;
pub use infer::infer_column_types;
pub use loader::{load, CsvLoader};
