//! # Inference
//!
//! Each column starts undecided and is widened by every non-null field of the
//! sample. Integer widens to Float; Timestamp only survives if every field is
//! a timestamp; any other mix falls back to String. A column with no non-null
//! field in the sample is a String column.

use contracts::{parse_float, parse_timestamp, DataType};

/// Candidate type for one column during inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateType {
    /// No non-null field seen yet
    Unknown,
    Integer,
    Float,
    Timestamp,
    /// Widest, encompasses any field
    String,
}

impl CandidateType {
    fn as_datatype(self) -> DataType {
        match self {
            Self::Unknown | Self::String => DataType::String,
            Self::Integer => DataType::Integer,
            Self::Float => DataType::Float,
            Self::Timestamp => DataType::Timestamp,
        }
    }

    /// Narrowest candidate accepting `input`
    fn classify(input: &str) -> Self {
        if input.parse::<i64>().is_ok() {
            Self::Integer
        } else if parse_float(input).is_some() {
            Self::Float
        } else if parse_timestamp(input).is_some() {
            Self::Timestamp
        } else {
            Self::String
        }
    }

    /// Update this candidate type based on some string input.
    fn update_from_input(&mut self, input: &str) {
        *self = match *self {
            Self::Unknown => Self::classify(input),
            Self::Integer => {
                if input.parse::<i64>().is_ok() {
                    Self::Integer
                } else if parse_float(input).is_some() {
                    Self::Float
                } else {
                    Self::String
                }
            }
            Self::Float => {
                if parse_float(input).is_some() {
                    Self::Float
                } else {
                    Self::String
                }
            }
            Self::Timestamp => {
                if parse_timestamp(input).is_some() {
                    Self::Timestamp
                } else {
                    Self::String
                }
            }
            Self::String => Self::String,
        };
    }
}

/// Infer one type per column from sample records.
///
/// `is_null` decides which fields are skipped. Records are expected to have
/// `width` fields; extra fields are ignored.
pub fn infer_column_types<'a, I, R>(
    records: I,
    width: usize,
    is_null: impl Fn(&str) -> bool,
) -> Vec<DataType>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = &'a str>,
{
    let mut candidates = vec![CandidateType::Unknown; width];

    for record in records {
        for (candidate, field) in candidates.iter_mut().zip(record) {
            if !is_null(field) {
                candidate.update_from_input(field);
            }
        }
    }

    candidates.into_iter().map(CandidateType::as_datatype).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer(rows: &[&[&str]]) -> Vec<DataType> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        infer_column_types(rows.iter().map(|r| r.iter().copied()), width, str::is_empty)
    }

    #[test]
    fn test_integer_column() {
        assert_eq!(infer(&[&["1"], &["22"], &["-3"]]), vec![DataType::Integer]);
    }

    #[test]
    fn test_integer_widens_to_float() {
        assert_eq!(infer(&[&["1"], &["2.5"]]), vec![DataType::Float]);
    }

    #[test]
    fn test_float_then_text_is_string() {
        assert_eq!(infer(&[&["1.5"], &["delivered"]]), vec![DataType::String]);
    }

    #[test]
    fn test_timestamp_column() {
        assert_eq!(
            infer(&[&["2017-10-02 10:56:33"], &["2018-07-24 20:41:37"]]),
            vec![DataType::Timestamp]
        );
    }

    #[test]
    fn test_timestamp_mixed_with_number_is_string() {
        assert_eq!(
            infer(&[&["2017-10-02 10:56:33"], &["17"]]),
            vec![DataType::String]
        );
    }

    #[test]
    fn test_nulls_skipped_and_all_null_is_string() {
        assert_eq!(
            infer(&[&["", "7"], &["", ""], &["", "9"]]),
            vec![DataType::String, DataType::Integer]
        );
    }

    #[test]
    fn test_nan_and_inf_are_strings() {
        assert_eq!(infer(&[&["nan"], &["inf"]]), vec![DataType::String]);
        assert_eq!(infer(&[&["1.5"], &["infinity"]]), vec![DataType::String]);
        assert_eq!(infer(&[&["3"], &["NaN"]]), vec![DataType::String]);
    }

    #[test]
    fn test_hex_ids_are_strings() {
        assert_eq!(
            infer(&[&["06b8999e2fba1a1fbc88172c00ba8bc7"], &["18955e83d337fd6b2def6b18a428ac77"]]),
            vec![DataType::String]
        );
    }
}
