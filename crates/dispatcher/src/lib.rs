//! # Dispatcher
//!
//! 报表分发模块。
//!
//! 负责：
//! - 消费 `StepReport`
//! - Fan-out 到多个 sinks
//! - 单个 sink 失败不影响其他 sink，失败在分发结束后返回

pub mod dispatcher;
pub mod error;
pub mod metrics;
pub mod sinks;

pub use contracts::{ReportSink, StepReport};
pub use dispatcher::{create_dispatcher, ReportDispatcher};
pub use error::DispatcherError;
pub use metrics::{MetricsSnapshot, SinkMetrics};
pub use sinks::{ConsoleSink, JsonSink, LogSink};
