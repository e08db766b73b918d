//! Sink implementations
//!
//! Contains ConsoleSink, LogSink, and JsonSink.

mod console;
mod json;
mod log;

pub use self::console::{ConsoleSink, DEFAULT_MAX_ROWS};
pub use self::json::JsonSink;
pub use self::log::LogSink;
