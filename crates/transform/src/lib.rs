//! # Transform
//!
//! Pure relational operations over immutable datasets.
//!
//! 负责：
//! - Schema inspection and row counts
//! - Group-by with count, ordered by count descending
//! - Inner / left equi-join on one column
//! - Top-N of an ordered result
//! - Deferred `Plan` with explicit `materialize`
//!
//! ## 使用示例
//!
//! ```ignore
//! use transform::{group_and_count, inner_join, top_n};
//!
//! let by_status = group_and_count(&orders, &["order_status"], true)?;
//! let joined = inner_join(&orders, &customers, "customer_id")?;
//! let top = top_n(&by_status, 5)?;
//! ```

mod group;
mod inspect;
mod join;
mod limit;
mod plan;

pub use contracts::{
    AggregationResult, Dataset, GroupOptions, GroupOrdering, JoinKind, NullKeyPolicy,
};
pub use group::{group_and_count, group_and_count_with};
pub use inspect::{count, describe_schema};
pub use join::{inner_join, join, unmatched_rows};
pub use limit::{limit, top_n};
pub use plan::Plan;
