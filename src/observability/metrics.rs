//! Operational metrics
//!
//! Counters only, monotonic, reset on process start. Thread-safe with
//! relaxed atomics; eventual consistency is fine for metrics.

use std::sync::atomic::{AtomicU64, Ordering};

/// The metrics the dispatcher publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Dispatches that produced a response (any status code).
    SuccessfulInvocations,
    /// Dispatches that hit the outermost failure boundary.
    InvocationErrors,
    /// Items written by the create handler.
    ItemsCreated,
    /// Duration of the create operation, in milliseconds.
    ProcessingTime,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SuccessfulInvocations => "SuccessfulInvocations",
            Metric::InvocationErrors => "InvocationErrors",
            Metric::ItemsCreated => "ItemsCreated",
            Metric::ProcessingTime => "ProcessingTime",
        }
    }

    /// Unit attached when the metric is published.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::ProcessingTime => "Milliseconds",
            _ => "Count",
        }
    }
}

/// Registry aggregating every emitted metric in-process.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    successful_invocations: AtomicU64,
    invocation_errors: AtomicU64,
    items_created: AtomicU64,
    processing_time_ms: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one emission into its counter. Timings accumulate total
    /// milliseconds.
    pub fn record(&self, metric: Metric, value: u64) {
        let counter = match metric {
            Metric::SuccessfulInvocations => &self.successful_invocations,
            Metric::InvocationErrors => &self.invocation_errors,
            Metric::ItemsCreated => &self.items_created,
            Metric::ProcessingTime => &self.processing_time_ms,
        };
        counter.fetch_add(value, Ordering::Relaxed);
    }

    /// Point-in-time view of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            successful_invocations: self.successful_invocations.load(Ordering::Relaxed),
            invocation_errors: self.invocation_errors.load(Ordering::Relaxed),
            items_created: self.items_created.load(Ordering::Relaxed),
            processing_time_ms: self.processing_time_ms.load(Ordering::Relaxed),
        }
    }

    /// All counters as a JSON object.
    pub fn to_json(&self) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"{{"successful_invocations":{},"invocation_errors":{},"items_created":{},"processing_time_ms":{}}}"#,
            snapshot.successful_invocations,
            snapshot.invocation_errors,
            snapshot.items_created,
            snapshot.processing_time_ms,
        )
    }
}

/// A point-in-time snapshot of all metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub successful_invocations: u64,
    pub invocation_errors: u64,
    pub items_created: u64,
    pub processing_time_ms: u64,
}
