//! The `Logger` capability: an abstract, leveled logger the router and event
//! bus call on registration/subscription and on unrouted subscriber
//! failures. The core never depends on a concrete logging framework's
//! formatter, levels, or color handling — only on this trait.

use serde_json::Value;

/// One structured log record.
#[derive(Debug, Clone)]
pub struct LogRecord {
    /// The message text.
    pub message: String,
    /// An optional free-form category, e.g. `"router"` or `"event_bus"`.
    pub category: Option<&'static str>,
    /// Structured data attached to the record.
    pub data: Option<Value>,
    /// The error this record describes, if any.
    pub error: Option<String>,
    /// The correlation id in scope, if any.
    pub correlation_id: Option<String>,
}

impl LogRecord {
    /// Starts a record with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category: None,
            data: None,
            error: None,
            correlation_id: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl std::fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

/// Leveled logging, consumed by the router and event bus.
///
/// Core calls are informational on `register`/`subscribe_event` and
/// error-level on subscription failures that reach no `on_error` sink.
pub trait Logger: Send + Sync {
    /// Debug-level record.
    fn debug(&self, record: LogRecord);
    /// Info-level record.
    fn info(&self, record: LogRecord);
    /// Warn-level record.
    fn warn(&self, record: LogRecord);
    /// Error-level record.
    fn error(&self, record: LogRecord);
    /// Critical-level record, for failures that threaten the whole process.
    fn critical(&self, record: LogRecord);
}

/// The default [`Logger`], backing onto the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, record: LogRecord) {
        tracing::debug!(
            category = record.category,
            data = ?record.data,
            correlation_id = record.correlation_id.as_deref(),
            "{}",
            record.message
        );
    }

    fn info(&self, record: LogRecord) {
        tracing::info!(
            category = record.category,
            data = ?record.data,
            correlation_id = record.correlation_id.as_deref(),
            "{}",
            record.message
        );
    }

    fn warn(&self, record: LogRecord) {
        tracing::warn!(
            category = record.category,
            data = ?record.data,
            error = record.error.as_deref(),
            correlation_id = record.correlation_id.as_deref(),
            "{}",
            record.message
        );
    }

    fn error(&self, record: LogRecord) {
        tracing::error!(
            category = record.category,
            data = ?record.data,
            error = record.error.as_deref(),
            correlation_id = record.correlation_id.as_deref(),
            "{}",
            record.message
        );
    }

    fn critical(&self, record: LogRecord) {
        tracing::error!(
            category = record.category,
            data = ?record.data,
            error = record.error.as_deref(),
            correlation_id = record.correlation_id.as_deref(),
            critical = true,
            "{}",
            record.message
        );
    }
}
