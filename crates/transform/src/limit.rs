//! Top-N / limit

use contracts::{AggregationResult, ContractError, Dataset};

/// First `n` groups of an ordered aggregation, clamped to the group count.
///
/// # Errors
/// `InvalidParameter` if `n` is negative
pub fn top_n(result: &AggregationResult, n: i64) -> Result<Dataset, ContractError> {
    limit(result.dataset(), n)
}

/// First `n` rows of a dataset, clamped to the row count
pub fn limit(dataset: &Dataset, n: i64) -> Result<Dataset, ContractError> {
    let n = usize::try_from(n).map_err(|_| {
        ContractError::invalid_parameter("n", format!("must be a non-negative integer, got {n}"))
    })?;
    Ok(dataset.head(n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group_and_count;
    use contracts::{DataType, Field, Schema, Value};

    fn states(values: &[&str]) -> Dataset {
        let schema = Schema::try_new(vec![Field::new("customer_state", DataType::String)]).unwrap();
        Dataset::try_new(schema, values.iter().map(|v| vec![Value::from(*v)]).collect()).unwrap()
    }

    #[test]
    fn test_top_n_keeps_order() {
        let ds = states(&["SP", "SP", "SP", "RJ", "RJ", "MG"]);
        let result = group_and_count(&ds, &["customer_state"], true).unwrap();
        let top = top_n(&result, 2).unwrap();
        assert_eq!(top.num_rows(), 2);
        assert_eq!(top.value(0, "customer_state"), Some(&Value::from("SP")));
        assert_eq!(top.value(1, "customer_state"), Some(&Value::from("RJ")));
    }

    #[test]
    fn test_top_n_clamped() {
        let ds = states(&["SP", "RJ"]);
        let result = group_and_count(&ds, &["customer_state"], true).unwrap();
        assert_eq!(top_n(&result, 50).unwrap().num_rows(), 2);
        assert_eq!(top_n(&result, 0).unwrap().num_rows(), 0);
    }

    #[test]
    fn test_negative_n_rejected() {
        let ds = states(&["SP"]);
        let result = group_and_count(&ds, &["customer_state"], true).unwrap();
        assert!(matches!(
            top_n(&result, -1),
            Err(ContractError::InvalidParameter { .. })
        ));
    }
}
