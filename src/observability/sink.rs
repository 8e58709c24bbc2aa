//! Observability sink
//!
//! The collaborator interface the dispatcher emits through, and the
//! default stdout implementation.

use chrono::Utc;

use super::logger::{Logger, Severity};
use super::metrics::{Metric, MetricsRegistry, MetricsSnapshot};

/// Fire-and-forget logging and metrics collaborator.
///
/// Every method is best-effort and returns `()`: implementations swallow
/// their own I/O failures and never block or fail the caller's response
/// path.
pub trait ObservabilitySink: Send + Sync {
    /// Emit one structured log record.
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]);

    /// Publish a counter increment.
    fn emit_count(&self, metric: Metric, value: u64, dimensions: &[(&str, &str)]);

    /// Publish a duration, in milliseconds.
    fn emit_timing(&self, metric: Metric, millis: u64, dimensions: &[(&str, &str)]);
}

/// Sink writing one JSON log line per event to stdout/stderr and folding
/// metric emissions into an in-process registry.
#[derive(Debug, Default)]
pub struct StdoutSink {
    registry: MetricsRegistry,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point-in-time view of everything emitted so far.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.registry.snapshot()
    }
}

impl ObservabilitySink for StdoutSink {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        let ts = Utc::now().to_rfc3339();
        let mut stamped = Vec::with_capacity(fields.len() + 1);
        stamped.extend_from_slice(fields);
        stamped.push(("ts", ts.as_str()));
        Logger::log(severity, event, &stamped);
    }

    fn emit_count(&self, metric: Metric, value: u64, dimensions: &[(&str, &str)]) {
        self.registry.record(metric, value);

        let rendered = value.to_string();
        let mut fields = vec![
            ("metric", metric.as_str()),
            ("value", rendered.as_str()),
            ("unit", metric.unit()),
        ];
        fields.extend_from_slice(dimensions);
        self.log(Severity::Trace, "METRIC_EMITTED", &fields);
    }

    fn emit_timing(&self, metric: Metric, millis: u64, dimensions: &[(&str, &str)]) {
        self.registry.record(metric, millis);

        let rendered = millis.to_string();
        let mut fields = vec![
            ("metric", metric.as_str()),
            ("value", rendered.as_str()),
            ("unit", metric.unit()),
        ];
        fields.extend_from_slice(dimensions);
        self.log(Severity::Trace, "METRIC_EMITTED", &fields);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_fold_into_registry() {
        let sink = StdoutSink::new();

        sink.emit_count(Metric::ItemsCreated, 1, &[("component", "test")]);
        sink.emit_count(Metric::ItemsCreated, 1, &[("component", "test")]);
        sink.emit_timing(Metric::ProcessingTime, 15, &[]);

        let snapshot = sink.metrics();
        assert_eq!(snapshot.items_created, 2);
        assert_eq!(snapshot.processing_time_ms, 15);
    }
}
