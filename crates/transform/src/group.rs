//! Group-by with count

use std::collections::HashMap;

use contracts::{
    AggregationResult, ContractError, DataType, Dataset, Field, GroupOptions, GroupOrdering,
    NullKeyPolicy, Schema, Value, COUNT_COLUMN,
};
use observability::record_groups;
use tracing::{debug, instrument};

/// Group rows by equality on `group_by` and count each group.
///
/// With `order_by_count_descending` the result is sorted by count descending,
/// ties broken by group key ascending; otherwise by group key ascending.
/// Null key values form their own group.
///
/// # Errors
/// - `InvalidParameter` if `group_by` is empty
/// - `ColumnNotFound` if a grouping column is absent
pub fn group_and_count<S: AsRef<str>>(
    dataset: &Dataset,
    group_by: &[S],
    order_by_count_descending: bool,
) -> Result<AggregationResult, ContractError> {
    group_and_count_with(
        dataset,
        group_by,
        GroupOptions::order_by_count(order_by_count_descending),
    )
}

/// Group-and-count with explicit ordering and null-key handling
#[instrument(
    name = "group_and_count",
    skip(dataset, group_by),
    fields(rows = dataset.num_rows())
)]
pub fn group_and_count_with<S: AsRef<str>>(
    dataset: &Dataset,
    group_by: &[S],
    options: GroupOptions,
) -> Result<AggregationResult, ContractError> {
    if group_by.is_empty() {
        return Err(ContractError::invalid_parameter(
            "group_by",
            "at least one grouping column is required",
        ));
    }

    let schema = dataset.schema();
    let indices = group_by
        .iter()
        .map(|name| schema.require(name.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    let mut groups: HashMap<Vec<Value>, i64> = HashMap::new();
    let mut skipped = 0usize;
    for row in dataset.rows() {
        let key: Vec<Value> = indices.iter().map(|&i| row[i].clone()).collect();
        if options.null_keys == NullKeyPolicy::Drop && key.iter().any(Value::is_null) {
            skipped += 1;
            continue;
        }
        *groups.entry(key).or_insert(0) += 1;
    }

    let mut entries: Vec<(Vec<Value>, i64)> = groups.into_iter().collect();
    match options.ordering {
        GroupOrdering::CountDescending => {
            entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)))
        }
        GroupOrdering::KeyAscending => entries.sort_by(|a, b| a.0.cmp(&b.0)),
    }

    let mut fields: Vec<Field> = indices
        .iter()
        .map(|&i| schema.fields()[i].clone())
        .collect();
    let key_schema = Schema::try_new(fields.clone())?;
    let count_column = key_schema.unique_name(COUNT_COLUMN);
    fields.push(Field::new(count_column.clone(), DataType::Integer));

    let rows = entries
        .into_iter()
        .map(|(mut key, n)| {
            key.push(Value::Integer(n));
            key
        })
        .collect();

    let keys: Vec<String> = group_by.iter().map(|s| s.as_ref().to_string()).collect();
    let key_label = keys.join(",");
    let result = Dataset::try_new(Schema::try_new(fields)?, rows)?;

    record_groups(&key_label, result.num_rows());
    debug!(
        keys = %key_label,
        groups = result.num_rows(),
        skipped_null_keys = skipped,
        "Grouped"
    );

    Ok(AggregationResult::new(
        result,
        keys,
        count_column,
        options.ordering,
    ))
}
