//! Per-sink counters

/// Counters for a single sink
#[derive(Debug, Default, Clone)]
pub struct SinkMetrics {
    write_count: u64,
    failure_count: u64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.write_count
    }

    pub fn inc_write_count(&mut self) {
        self.write_count += 1;
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn inc_failure_count(&mut self) {
        self.failure_count += 1;
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            write_count: self.write_count,
            failure_count: self.failure_count,
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub write_count: u64,
    pub failure_count: u64,
}
