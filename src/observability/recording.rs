//! Recording sink
//!
//! Test double for the observability collaborator: captures every emission
//! in memory so suites can assert on log events and counters.

use std::sync::Mutex;

use super::logger::Severity;
use super::metrics::Metric;
use super::sink::ObservabilitySink;

/// A captured log record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    pub event: String,
    pub fields: Vec<(String, String)>,
}

impl LogRecord {
    /// Value of a field by key, if present.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// A captured metric emission.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    pub metric: Metric,
    pub value: u64,
    pub dimensions: Vec<(String, String)>,
}

/// Sink capturing every emission in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    logs: Mutex<Vec<LogRecord>>,
    counts: Mutex<Vec<MetricRecord>>,
    timings: Mutex<Vec<MetricRecord>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured log records, in emission order.
    pub fn logs(&self) -> Vec<LogRecord> {
        self.logs.lock().map(|logs| logs.clone()).unwrap_or_default()
    }

    /// Captured event names, in emission order.
    pub fn events(&self) -> Vec<String> {
        self.logs()
            .into_iter()
            .map(|record| record.event)
            .collect()
    }

    /// All captured counter emissions.
    pub fn counts(&self) -> Vec<MetricRecord> {
        self.counts
            .lock()
            .map(|counts| counts.clone())
            .unwrap_or_default()
    }

    /// All captured timing emissions.
    pub fn timings(&self) -> Vec<MetricRecord> {
        self.timings
            .lock()
            .map(|timings| timings.clone())
            .unwrap_or_default()
    }

    /// Sum of counter values emitted for `metric`.
    pub fn count_total(&self, metric: Metric) -> u64 {
        self.counts()
            .iter()
            .filter(|record| record.metric == metric)
            .map(|record| record.value)
            .sum()
    }
}

fn owned(fields: &[(&str, &str)]) -> Vec<(String, String)> {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl ObservabilitySink for RecordingSink {
    fn log(&self, severity: Severity, event: &str, fields: &[(&str, &str)]) {
        // Poisoned lock means a panicking test thread; drop the record.
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(LogRecord {
                severity,
                event: event.to_string(),
                fields: owned(fields),
            });
        }
    }

    fn emit_count(&self, metric: Metric, value: u64, dimensions: &[(&str, &str)]) {
        if let Ok(mut counts) = self.counts.lock() {
            counts.push(MetricRecord {
                metric,
                value,
                dimensions: owned(dimensions),
            });
        }
    }

    fn emit_timing(&self, metric: Metric, millis: u64, dimensions: &[(&str, &str)]) {
        if let Ok(mut timings) = self.timings.lock() {
            timings.push(MetricRecord {
                metric,
                value: millis,
                dimensions: owned(dimensions),
            });
        }
    }
}
