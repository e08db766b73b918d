//! Equi-join on a single column

use std::collections::{HashMap, HashSet};

use contracts::{ContractError, Dataset, Field, JoinKind, JoinSide, Row, Schema, Value};
use observability::record_join;
use tracing::{debug, instrument};

/// Suffix for right columns whose name is already used on the left
const RIGHT_SUFFIX: &str = "_right";

/// Inner join: each left row paired with every right row sharing `on`.
///
/// Left rows without a match are dropped. Null keys never match.
pub fn inner_join(left: &Dataset, right: &Dataset, on: &str) -> Result<Dataset, ContractError> {
    join(left, right, on, JoinKind::Inner)
}

/// Equi-join `left` and `right` on column `on`.
///
/// Output columns are all left columns followed by the right columns except
/// the key. Output rows follow left order, then right order per key.
///
/// # Errors
/// - `JoinKeyMissing` if `on` is absent from either schema
/// - `JoinKeyTypeMismatch` if the key types differ
#[instrument(
    name = "join",
    skip(left, right),
    fields(left_rows = left.num_rows(), right_rows = right.num_rows())
)]
pub fn join(
    left: &Dataset,
    right: &Dataset,
    on: &str,
    kind: JoinKind,
) -> Result<Dataset, ContractError> {
    let (left_key, right_key) = key_indices(left, right, on)?;
    let schema = output_schema(left.schema(), right.schema(), right_key)?;

    let mut index: HashMap<&Value, Vec<usize>> = HashMap::new();
    for (idx, row) in right.rows().iter().enumerate() {
        let key = &row[right_key];
        if !key.is_null() {
            index.entry(key).or_default().push(idx);
        }
    }

    let right_width = right.schema().len() - 1;
    let mut rows: Vec<Row> = Vec::with_capacity(left.num_rows());
    let mut unmatched = 0usize;

    for left_row in left.rows() {
        let key = &left_row[left_key];
        let matches = if key.is_null() { None } else { index.get(key) };

        match matches {
            Some(right_rows) => {
                for &r in right_rows {
                    rows.push(combine(left_row, &right.rows()[r], right_key));
                }
            }
            None => {
                unmatched += 1;
                if kind == JoinKind::Left {
                    let mut row = left_row.clone();
                    row.extend(std::iter::repeat(Value::Null).take(right_width));
                    rows.push(row);
                }
            }
        }
    }

    let joined = Dataset::try_new(schema, rows)?;

    record_join(kind, joined.num_rows(), unmatched);
    debug!(
        on,
        %kind,
        rows = joined.num_rows(),
        unmatched_left = unmatched,
        "Joined"
    );

    Ok(joined)
}

/// Left rows whose key has no match on the right (null keys included)
pub fn unmatched_rows(left: &Dataset, right: &Dataset, on: &str) -> Result<usize, ContractError> {
    let (left_key, right_key) = key_indices(left, right, on)?;
    let keys: HashSet<&Value> = right
        .rows()
        .iter()
        .map(|row| &row[right_key])
        .filter(|v| !v.is_null())
        .collect();
    Ok(left
        .rows()
        .iter()
        .filter(|row| !keys.contains(&row[left_key]))
        .count())
}

/// Key column index on each side, after checking presence and type
fn key_indices(left: &Dataset, right: &Dataset, on: &str) -> Result<(usize, usize), ContractError> {
    let left_key = left
        .schema()
        .index_of(on)
        .ok_or_else(|| ContractError::join_key_missing(on, JoinSide::Left))?;
    let right_key = right
        .schema()
        .index_of(on)
        .ok_or_else(|| ContractError::join_key_missing(on, JoinSide::Right))?;

    let left_type = left.schema().fields()[left_key].data_type;
    let right_type = right.schema().fields()[right_key].data_type;
    if left_type != right_type {
        return Err(ContractError::JoinKeyTypeMismatch {
            column: on.to_string(),
            left: left_type,
            right: right_type,
        });
    }
    Ok((left_key, right_key))
}

fn combine(left_row: &Row, right_row: &Row, right_key: usize) -> Row {
    let mut row = Vec::with_capacity(left_row.len() + right_row.len() - 1);
    row.extend(left_row.iter().cloned());
    row.extend(
        right_row
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != right_key)
            .map(|(_, v)| v.clone()),
    );
    row
}

fn output_schema(left: &Schema, right: &Schema, right_key: usize) -> Result<Schema, ContractError> {
    let mut fields: Vec<Field> = left.fields().to_vec();
    for (idx, field) in right.fields().iter().enumerate() {
        if idx == right_key {
            continue;
        }
        let taken = Schema::try_new(fields.clone())?;
        let name = if taken.contains(&field.name) {
            taken.unique_name(&format!("{}{RIGHT_SUFFIX}", field.name))
        } else {
            field.name.clone()
        };
        fields.push(Field::new(name, field.data_type));
    }
    Schema::try_new(fields)
}
