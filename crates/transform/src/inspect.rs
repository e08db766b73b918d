//! Schema inspection and counting

use contracts::{DataType, Dataset};

/// `(name, type)` pairs in column order
pub fn describe_schema(dataset: &Dataset) -> Vec<(String, DataType)> {
    dataset.schema().describe()
}

/// Total row count
pub fn count(dataset: &Dataset) -> usize {
    dataset.num_rows()
}
