//! Schema - ordered (name, type) pairs

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ContractError, DataType};

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered sequence of fields with unique names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// Build a schema, rejecting duplicate column names
    pub fn try_new(fields: Vec<Field>) -> Result<Self, ContractError> {
        let mut seen = HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ContractError::invalid_parameter(
                    "schema",
                    format!("duplicate column name '{}'", field.name),
                ));
            }
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a column by name
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Resolve a column index or fail with `ColumnNotFound`
    pub fn require(&self, name: &str) -> Result<usize, ContractError> {
        self.index_of(name)
            .ok_or_else(|| ContractError::column_not_found(name, self.column_names()))
    }

    /// `(name, type)` listing in column order
    pub fn describe(&self) -> Vec<(String, DataType)> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.data_type))
            .collect()
    }

    /// `base`, or `base_1`, `base_2`, ... whichever is not taken yet
    pub fn unique_name(&self, base: &str) -> String {
        if !self.contains(base) {
            return base.to_string();
        }
        (1..)
            .map(|i| format!("{base}_{i}"))
            .find(|candidate| !self.contains(candidate))
            .unwrap_or_else(|| base.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_schema() -> Schema {
        Schema::try_new(vec![
            Field::new("order_id", DataType::String),
            Field::new("customer_id", DataType::String),
            Field::new("order_status", DataType::String),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let result = Schema::try_new(vec![
            Field::new("a", DataType::Integer),
            Field::new("a", DataType::String),
        ]);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("duplicate column name 'a'"), "got: {err}");
    }

    #[test]
    fn test_index_lookup() {
        let schema = orders_schema();
        assert_eq!(schema.index_of("customer_id"), Some(1));
        assert_eq!(schema.index_of("missing"), None);
        assert!(matches!(
            schema.require("missing"),
            Err(ContractError::ColumnNotFound { .. })
        ));
    }

    #[test]
    fn test_describe_keeps_order() {
        let described = orders_schema().describe();
        let names: Vec<_> = described.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["order_id", "customer_id", "order_status"]);
    }

    #[test]
    fn test_unique_name() {
        let schema = Schema::try_new(vec![
            Field::new("count", DataType::Integer),
            Field::new("count_1", DataType::Integer),
        ])
        .unwrap();
        assert_eq!(schema.unique_name("count"), "count_2");
        assert_eq!(schema.unique_name("total"), "total");
    }
}
