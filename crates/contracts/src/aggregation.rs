//! AggregationResult - grouped and counted dataset

use crate::{Dataset, GroupOrdering, Value};

/// Default name of the count column
pub const COUNT_COLUMN: &str = "count";

/// Dataset produced by grouping another dataset and counting each group.
///
/// Columns are the group keys in the requested order followed by the count
/// column. Rows are already sorted according to `ordering`.
#[derive(Debug, Clone)]
pub struct AggregationResult {
    dataset: Dataset,
    keys: Vec<String>,
    count_column: String,
    ordering: GroupOrdering,
}

impl AggregationResult {
    pub fn new(
        dataset: Dataset,
        keys: Vec<String>,
        count_column: String,
        ordering: GroupOrdering,
    ) -> Self {
        Self {
            dataset,
            keys,
            count_column,
            ordering,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn into_dataset(self) -> Dataset {
        self.dataset
    }

    pub fn count_column(&self) -> &str {
        &self.count_column
    }

    pub fn ordering(&self) -> GroupOrdering {
        self.ordering
    }

    pub fn num_groups(&self) -> usize {
        self.dataset.num_rows()
    }

    /// Per-group counts in result order
    pub fn counts(&self) -> impl Iterator<Item = i64> + '_ {
        let col = self.keys.len();
        self.dataset
            .rows()
            .iter()
            .map(move |row| row[col].as_i64().unwrap_or(0))
    }

    /// Sum of all group counts
    pub fn total_count(&self) -> i64 {
        self.counts().sum()
    }

    /// `(key values, count)` pairs in result order
    pub fn groups(&self) -> impl Iterator<Item = (&[Value], i64)> + '_ {
        let col = self.keys.len();
        self.dataset
            .rows()
            .iter()
            .map(move |row| (&row[..col], row[col].as_i64().unwrap_or(0)))
    }
}
