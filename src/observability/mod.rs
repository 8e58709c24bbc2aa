//! Observability for itemstore
//!
//! Structured one-line JSON logs plus best-effort counters and timers, all
//! behind the [`ObservabilitySink`] trait so tests can substitute a
//! recording double. Everything here is fire-and-forget: a failing sink
//! never affects the request path.

mod logger;
mod metrics;
mod recording;
mod sink;

pub use logger::{Logger, Severity};
pub use metrics::{Metric, MetricsRegistry, MetricsSnapshot};
pub use recording::{LogRecord, MetricRecord, RecordingSink};
pub use sink::{ObservabilitySink, StdoutSink};
