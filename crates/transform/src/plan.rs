//! Deferred plan
//!
//! Builder methods only record the operation; nothing runs until
//! `materialize`. Results are identical to calling the eager functions.

use std::fmt::Write as _;

use contracts::{ContractError, Dataset, GroupOptions, GroupOrdering, JoinKind};
use tracing::instrument;

use crate::{group_and_count_with, join, limit};

/// Logical plan tree over datasets
#[derive(Debug, Clone)]
pub enum Plan {
    /// Already-loaded dataset
    Scan { label: String, dataset: Dataset },
    /// Group-by with count
    GroupCount {
        input: Box<Plan>,
        keys: Vec<String>,
        options: GroupOptions,
    },
    /// Equi-join on one column
    Join {
        left: Box<Plan>,
        right: Box<Plan>,
        on: String,
        kind: JoinKind,
    },
    /// First `n` rows
    Limit { input: Box<Plan>, n: i64 },
}

impl Plan {
    pub fn scan(label: impl Into<String>, dataset: Dataset) -> Self {
        Self::Scan {
            label: label.into(),
            dataset,
        }
    }

    pub fn group_and_count<S: AsRef<str>>(self, keys: &[S], options: GroupOptions) -> Self {
        Self::GroupCount {
            input: Box::new(self),
            keys: keys.iter().map(|k| k.as_ref().to_string()).collect(),
            options,
        }
    }

    pub fn join(self, right: Plan, on: impl Into<String>, kind: JoinKind) -> Self {
        Self::Join {
            left: Box::new(self),
            right: Box::new(right),
            on: on.into(),
            kind,
        }
    }

    pub fn top_n(self, n: i64) -> Self {
        Self::Limit {
            input: Box::new(self),
            n,
        }
    }

    /// Execute the plan bottom-up
    #[instrument(name = "plan_materialize", skip(self), fields(root = self.node_name()))]
    pub fn materialize(&self) -> Result<Dataset, ContractError> {
        self.execute()
    }

    fn execute(&self) -> Result<Dataset, ContractError> {
        match self {
            Self::Scan { dataset, .. } => Ok(dataset.clone()),
            Self::GroupCount {
                input,
                keys,
                options,
            } => {
                let input = input.execute()?;
                Ok(group_and_count_with(&input, keys, *options)?.into_dataset())
            }
            Self::Join {
                left,
                right,
                on,
                kind,
            } => {
                let left = left.execute()?;
                let right = right.execute()?;
                join(&left, &right, on, *kind)
            }
            Self::Limit { input, n } => limit(&input.execute()?, *n),
        }
    }

    fn node_name(&self) -> &'static str {
        match self {
            Self::Scan { .. } => "scan",
            Self::GroupCount { .. } => "group_count",
            Self::Join { .. } => "join",
            Self::Limit { .. } => "limit",
        }
    }

    /// Indented, one node per line
    pub fn explain(&self) -> String {
        let mut out = String::new();
        self.explain_into(&mut out, 0);
        out
    }

    fn explain_into(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        // Writing to a String cannot fail
        let _ = match self {
            Self::Scan { label, dataset } => {
                writeln!(out, "{indent}Scan {label} [{} rows]", dataset.num_rows())
            }
            Self::GroupCount { keys, options, .. } => {
                let order = match options.ordering {
                    GroupOrdering::CountDescending => "count desc",
                    GroupOrdering::KeyAscending => "key asc",
                };
                writeln!(out, "{indent}GroupCount keys=[{}] order={order}", keys.join(", "))
            }
            Self::Join { on, kind, .. } => writeln!(out, "{indent}Join {kind} on={on}"),
            Self::Limit { n, .. } => writeln!(out, "{indent}Limit n={n}"),
        };

        match self {
            Self::Scan { .. } => {}
            Self::GroupCount { input, .. } | Self::Limit { input, .. } => {
                input.explain_into(out, depth + 1)
            }
            Self::Join { left, right, .. } => {
                left.explain_into(out, depth + 1);
                right.explain_into(out, depth + 1);
            }
        }
    }
}
