//! Diagnostics for recoverable data-quality problems.
//!
//! Handlers never fail on messy input. An unknown column, a weight that
//! does not parse, a rights URL that is not a URL: each becomes a
//! [`LogEntry`] written to a [`DiagnosticSink`] and the conversion carries
//! on. The core only writes to the sink, it never reads from it.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warning,
}

/// A single diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub level: LogLevel,
    /// Canonical field name the diagnostic is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl LogEntry {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Info,
            field: None,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: LogLevel::Warning,
            field: None,
            message: message.into(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }
}

/// Write-only channel for diagnostics.
pub trait DiagnosticSink: Send {
    fn log(&self, entry: LogEntry);

    fn warn(&self, field: &str, message: String) {
        self.log(LogEntry::warning(message).with_field(field));
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, entry: LogEntry) {
        let field = entry.field.as_deref().unwrap_or("-");
        match entry.level {
            LogLevel::Info => tracing::info!(field, "{}", entry.message),
            LogLevel::Warning => tracing::warn!(field, "{}", entry.message),
        }
    }
}

/// Keeps diagnostics in memory.
///
/// Clones share the same buffer, so a caller can hand one clone to a
/// [`Converter`](crate::transform::engine::Converter) and inspect another.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<LogEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.level == LogLevel::Warning)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn log(&self, entry: LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

/// Forwards diagnostics to `tracing` and counts them.
///
/// Memory use stays constant however many rows are converted. Clones
/// share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingSink {
    count: Arc<AtomicUsize>,
}

impl CountingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

impl DiagnosticSink for CountingSink {
    fn log(&self, entry: LogEntry) {
        self.count.fetch_add(1, Ordering::Relaxed);
        TracingSink.log(entry);
    }
}
