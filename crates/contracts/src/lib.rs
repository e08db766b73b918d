//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the walkthrough.
//! Business crates depend on this crate only, reverse dependencies are prohibited.
//!
//! ## Data Model
//! - A `Dataset` is an immutable, ordered collection of rows sharing a `Schema`
//! - Every transformation produces a new `Dataset`; inputs are never mutated
//! - Rows are positional and aligned with the schema's field order

mod aggregation;
mod blueprint;
mod dataset;
mod error;
mod ops;
mod report;
mod schema;
mod value;

pub use aggregation::*;
pub use blueprint::*;
pub use dataset::{Dataset, Row};
pub use error::*;
pub use ops::*;
pub use report::*;
pub use schema::{Field, Schema};
pub use value::{parse_float, parse_timestamp, DataType, Value, TIMESTAMP_DISPLAY_FORMAT};
