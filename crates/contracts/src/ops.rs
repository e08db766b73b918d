//! Relational operation options shared by config and transform

use std::fmt;

use serde::{Deserialize, Serialize};

/// Join variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Keep only rows with a matching key on both sides
    Inner,
    /// Keep every left row, right columns null when unmatched
    Left,
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inner => f.write_str("inner"),
            Self::Left => f.write_str("left"),
        }
    }
}

/// Side of a join, used in error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => f.write_str("left"),
            Self::Right => f.write_str("right"),
        }
    }
}

/// Handling of rows whose group key contains a null
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullKeyPolicy {
    /// Null keys form their own group
    #[default]
    Group,
    /// Rows with any null key are excluded
    Drop,
}

/// Output ordering of a grouped result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrdering {
    /// Count descending, ties by group key ascending
    CountDescending,
    /// Group key ascending
    KeyAscending,
}

/// Options for group-and-count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupOptions {
    pub ordering: GroupOrdering,
    pub null_keys: NullKeyPolicy,
}

impl Default for GroupOptions {
    fn default() -> Self {
        Self {
            ordering: GroupOrdering::CountDescending,
            null_keys: NullKeyPolicy::Group,
        }
    }
}

impl GroupOptions {
    /// Options from the plain "order by count descending" flag
    pub fn order_by_count(descending: bool) -> Self {
        Self {
            ordering: if descending {
                GroupOrdering::CountDescending
            } else {
                GroupOrdering::KeyAscending
            },
            ..Default::default()
        }
    }

    pub fn with_null_keys(mut self, null_keys: NullKeyPolicy) -> Self {
        self.null_keys = null_keys;
        self
    }
}
