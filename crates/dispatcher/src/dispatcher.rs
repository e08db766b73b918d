//! ReportDispatcher - fan-out of step reports to sinks

use contracts::{ContractError, ReportSink, SinkConfig, SinkType, StepReport};
use observability::record_report_dispatched;
use tracing::{debug, info, instrument, warn};

use crate::error::DispatcherError;
use crate::metrics::{MetricsSnapshot, SinkMetrics};
use crate::sinks::{ConsoleSink, JsonSink, LogSink};

struct SinkSlot {
    sink: Box<dyn ReportSink>,
    metrics: SinkMetrics,
}

/// Writes every report to every sink
///
/// A failing sink does not stop the others; the first failure is returned
/// once all sinks have seen the report.
#[derive(Default)]
pub struct ReportDispatcher {
    slots: Vec<SinkSlot>,
    dispatched: u64,
}

impl ReportDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `add_sink`
    pub fn with_sink(mut self, sink: Box<dyn ReportSink>) -> Self {
        self.add_sink(sink);
        self
    }

    pub fn add_sink(&mut self, sink: Box<dyn ReportSink>) {
        debug!(sink = sink.name(), "Sink registered");
        self.slots.push(SinkSlot {
            sink,
            metrics: SinkMetrics::new(),
        });
    }

    pub fn sink_count(&self) -> usize {
        self.slots.len()
    }

    /// Reports dispatched so far
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Get metrics for all sinks
    pub fn metrics(&self) -> Vec<(String, MetricsSnapshot)> {
        self.slots
            .iter()
            .map(|s| (s.sink.name().to_string(), s.metrics.snapshot()))
            .collect()
    }

    #[instrument(
        name = "dispatcher_dispatch",
        skip(self, report),
        fields(step = %report.step, sinks = self.slots.len())
    )]
    pub fn dispatch(&mut self, report: &StepReport) -> Result<(), ContractError> {
        self.dispatched += 1;
        let mut first_error = None;

        for slot in &mut self.slots {
            match slot.sink.write(report) {
                Ok(()) => {
                    slot.metrics.inc_write_count();
                    record_report_dispatched(slot.sink.name(), true);
                }
                Err(e) => {
                    slot.metrics.inc_failure_count();
                    record_report_dispatched(slot.sink.name(), false);
                    warn!(sink = slot.sink.name(), step = %report.step, error = %e, "Sink write failed");
                    first_error.get_or_insert(e);
                }
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    /// Flush and close every sink
    #[instrument(name = "dispatcher_finish", skip(self))]
    pub fn finish(&mut self) -> Result<(), ContractError> {
        let mut first_error = None;
        for slot in &mut self.slots {
            let result = slot.sink.flush().and_then(|()| slot.sink.close());
            if let Err(e) = result {
                warn!(sink = slot.sink.name(), error = %e, "Sink close failed");
                first_error.get_or_insert(e);
            }
        }
        info!(reports = self.dispatched, sinks = self.slots.len(), "Dispatcher finished");
        first_error.map_or(Ok(()), Err)
    }
}

/// Create a sink from configuration
#[instrument(
    name = "dispatcher_create_sink",
    skip(config),
    fields(sink = %config.name, sink_type = ?config.sink_type)
)]
fn create_sink(config: &SinkConfig) -> Result<Box<dyn ReportSink>, DispatcherError> {
    match config.sink_type {
        SinkType::Console => {
            let sink = ConsoleSink::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::sink_creation(&config.name, e))?;
            Ok(Box::new(sink))
        }
        SinkType::Log => Ok(Box::new(LogSink::new(&config.name))),
        SinkType::Json => Ok(Box::new(JsonSink::stdout(&config.name))),
    }
}

/// Convenience function to create a dispatcher from sink configs
#[instrument(name = "dispatcher_create", skip(sink_configs), fields(count = sink_configs.len()))]
pub fn create_dispatcher(sink_configs: &[SinkConfig]) -> Result<ReportDispatcher, DispatcherError> {
    let mut dispatcher = ReportDispatcher::new();
    for config in sink_configs {
        dispatcher.add_sink(create_sink(config)?);
    }
    Ok(dispatcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Sink that fails every write
    struct FailingSink;

    impl ReportSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        fn write(&mut self, _report: &StepReport) -> Result<(), ContractError> {
            Err(ContractError::sink_write("failing", "disk on fire"))
        }

        fn flush(&mut self) -> Result<(), ContractError> {
            Ok(())
        }

        fn close(&mut self) -> Result<(), ContractError> {
            Ok(())
        }
    }

    #[test]
    fn test_dispatcher_fanout() {
        let mut dispatcher = ReportDispatcher::new()
            .with_sink(Box::new(LogSink::new("sink1")))
            .with_sink(Box::new(LogSink::new("sink2")));

        for i in 0..5 {
            let report = StepReport::count(format!("step_{i}"), "Rows", i);
            dispatcher.dispatch(&report).unwrap();
        }
        dispatcher.finish().unwrap();

        assert_eq!(dispatcher.dispatched(), 5);
        for (_, snapshot) in dispatcher.metrics() {
            assert_eq!(snapshot.write_count, 5);
            assert_eq!(snapshot.failure_count, 0);
        }
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let mut dispatcher = ReportDispatcher::new()
            .with_sink(Box::new(FailingSink))
            .with_sink(Box::new(LogSink::new("log")));

        let result = dispatcher.dispatch(&StepReport::count("orders_count", "Orders", 3));
        assert!(matches!(result, Err(ContractError::SinkWrite { .. })));

        let metrics: HashMap<_, _> = dispatcher.metrics().into_iter().collect();
        assert_eq!(metrics["failing"].failure_count, 1);
        assert_eq!(metrics["log"].write_count, 1);
    }

    #[test]
    fn test_create_dispatcher_from_config() {
        let configs = vec![
            SinkConfig {
                name: "test_log".to_string(),
                sink_type: SinkType::Log,
                params: HashMap::new(),
            },
            SinkConfig {
                name: "test_json".to_string(),
                sink_type: SinkType::Json,
                params: HashMap::new(),
            },
        ];

        let dispatcher = create_dispatcher(&configs).unwrap();
        assert_eq!(dispatcher.sink_count(), 2);
    }

    #[test]
    fn test_bad_console_params() {
        let configs = vec![SinkConfig {
            name: "console".to_string(),
            sink_type: SinkType::Console,
            params: HashMap::from([("max_rows".to_string(), "-1".to_string())]),
        }];
        assert!(matches!(
            create_dispatcher(&configs),
            Err(DispatcherError::SinkCreation { .. })
        ));
    }
}
