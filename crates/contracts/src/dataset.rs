//! Dataset - immutable table of rows sharing a schema

use std::sync::Arc;

use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};

use crate::{ContractError, Schema, Value};

/// One row, values aligned with the schema's field order
pub type Row = Vec<Value>;

/// Immutable ordered collection of rows
///
/// Cloning is cheap: schema and rows are shared.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: Arc<Schema>,
    rows: Arc<Vec<Row>>,
}

impl Dataset {
    /// Build a dataset, checking that every row matches the schema width
    pub fn try_new(schema: Schema, rows: Vec<Row>) -> Result<Self, ContractError> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != schema.len())
        {
            return Err(ContractError::invalid_parameter(
                "rows",
                format!(
                    "row {idx} has {} values but schema has {} columns",
                    row.len(),
                    schema.len()
                ),
            ));
        }
        Ok(Self {
            schema: Arc::new(schema),
            rows: Arc::new(rows),
        })
    }

    /// Dataset with no rows
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema: Arc::new(schema),
            rows: Arc::new(Vec::new()),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value at `row` for column `name`
    pub fn value(&self, row: usize, name: &str) -> Option<&Value> {
        let col = self.schema.index_of(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    /// New dataset holding the first `n` rows (clamped)
    pub fn head(&self, n: usize) -> Self {
        if n >= self.rows.len() {
            return self.clone();
        }
        Self {
            schema: Arc::clone(&self.schema),
            rows: Arc::new(self.rows[..n].to_vec()),
        }
    }
}

/// Row rendered as a JSON-like object in column order
struct RowObject<'a> {
    schema: &'a Schema,
    row: &'a Row,
}

impl Serialize for RowObject<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.row.len()))?;
        for (field, value) in self.schema.fields().iter().zip(self.row) {
            map.serialize_entry(&field.name, value)?;
        }
        map.end()
    }
}

impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<_> = self
            .rows
            .iter()
            .map(|row| RowObject {
                schema: &self.schema,
                row,
            })
            .collect();

        let mut state = serializer.serialize_struct("Dataset", 2)?;
        state.serialize_field("schema", self.schema.as_ref())?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DataType, Field};

    fn customers() -> Dataset {
        let schema = Schema::try_new(vec![
            Field::new("customer_id", DataType::Integer),
            Field::new("name", DataType::String),
        ])
        .unwrap();
        Dataset::try_new(
            schema,
            vec![
                vec![Value::Integer(1), Value::from("A")],
                vec![Value::Integer(2), Value::from("B")],
                vec![Value::Integer(3), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_row_width_checked() {
        let schema = Schema::try_new(vec![Field::new("a", DataType::Integer)]).unwrap();
        let result = Dataset::try_new(schema, vec![vec![Value::Integer(1), Value::Null]]);
        assert!(matches!(result, Err(ContractError::InvalidParameter { .. })));
    }

    #[test]
    fn test_value_lookup() {
        let ds = customers();
        assert_eq!(ds.value(1, "name"), Some(&Value::from("B")));
        assert_eq!(ds.value(9, "name"), None);
        assert_eq!(ds.value(0, "missing"), None);
    }

    #[test]
    fn test_head_clamps_and_does_not_touch_input() {
        let ds = customers();
        assert_eq!(ds.head(2).num_rows(), 2);
        assert_eq!(ds.head(10).num_rows(), 3);
        assert_eq!(ds.num_rows(), 3);
    }

    #[test]
    fn test_serialize_rows_in_column_order() {
        let json = serde_json::to_value(customers().head(1)).unwrap();
        assert_eq!(json["rows"][0]["customer_id"], 1);
        assert_eq!(json["rows"][0]["name"], "A");
        assert_eq!(json["schema"][1]["data_type"], "string");
    }
}
