//! The message router: a named, type-keyed dispatch table for commands and
//! queries.
//!
//! `route` validates, dispatches, and instruments in one pass (spec.md
//! §4.D's ten-step routing algorithm); `register` idempotently replaces any
//! prior registration for a type, matching Open Question (i) in spec.md §9
//! (the source silently replaces — no warning is logged on overwrite).

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::error::CoreError;
use crate::logger::LogRecord;
use crate::observability::{SpanAttributes, SpanKind};
use crate::validator::{ValidationOutcome, Validator};

use super::config::RouterOptions;
use super::handler::{HandlerEntry, HandlerFn};

/// A named, type-keyed message router. Cloning is cheap — it shares the
/// underlying handler table and observability adapters (`Arc`-backed).
#[derive(Clone)]
pub struct MessageRouter {
    name: String,
    handlers: Arc<DashMap<String, HandlerEntry>>,
    options: RouterOptions,
}

impl MessageRouter {
    /// Creates a router with the given name and the default observability
    /// adapters.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, RouterOptions::default())
    }

    /// Creates a router with explicit options (adapters, logging hooks).
    #[must_use]
    pub fn with_options(name: impl Into<String>, options: RouterOptions) -> Self {
        Self {
            name: name.into(),
            handlers: Arc::new(DashMap::new()),
            options,
        }
    }

    /// This router instance's name, as used in the `messaging.router_name`
    /// span attribute and the `router_name` metric label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers `handler` for `message_type`, validated against `schema`
    /// before every invocation. Replaces any previous registration for the
    /// same type; registration order otherwise doesn't matter.
    pub fn register(
        &self,
        message_type: impl Into<String>,
        handler: HandlerFn,
        schema: Arc<dyn Validator>,
    ) {
        let message_type = message_type.into();
        self.handlers
            .insert(message_type.clone(), HandlerEntry { handler, schema });
        self.options.logger.info(
            LogRecord::new(format!(
                "Registered handler for message type \"{message_type}\""
            ))
            .with_category("router")
            .with_data(serde_json::json!({
                "router_name": self.name,
                "message_type": message_type,
            })),
        );
    }

    /// Validates and dispatches `msg`. See spec.md §4.D for the full
    /// algorithm; this is its Rust shape.
    pub async fn route(&self, msg: Value) -> Result<Value, CoreError> {
        let message_type = msg
            .get("type")
            .and_then(Value::as_str)
            .map(str::to_string);
        let correlation_id = msg
            .get("correlationid")
            .and_then(Value::as_str)
            .map(str::to_string);

        let attrs = SpanAttributes {
            messaging_system: Some("nimbusRouter"),
            router_name: Some(self.name.clone()),
            operation: Some("route"),
            destination: Some(
                message_type
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            correlation_id: correlation_id.clone(),
            ..SpanAttributes::default()
        };
        let span = self
            .options
            .tracer
            .start_span("router.route", SpanKind::Internal, &attrs);

        if self.options.log_input {
            self.options.logger.debug(
                LogRecord::new("Routing input")
                    .with_category("router")
                    .with_data(msg.clone()),
            );
        }

        let outcome = span.instrument(self.route_inner(&msg, message_type.clone())).await;

        let status = if outcome.is_ok() { "success" } else { "error" };
        let labels: Vec<(&'static str, String)> = vec![
            ("router_name", self.name.clone()),
            (
                "message_type",
                message_type.clone().unwrap_or_else(|| "unknown".to_string()),
            ),
            ("status", status.to_string()),
        ];
        self.options
            .meter
            .counter("router_messages_routed_total")
            .increment(1, &labels);
        self.options
            .meter
            .histogram("router_routing_duration_seconds")
            .record(span.elapsed().as_secs_f64(), &labels[..2]);

        match &outcome {
            Err(err) => span.record_error(err),
            Ok(result) if self.options.log_output => {
                self.options.logger.debug(
                    LogRecord::new("Routing output")
                        .with_category("router")
                        .with_data(result.clone()),
                );
            }
            Ok(_) => {}
        }

        outcome
    }

    async fn route_inner(
        &self,
        msg: &Value,
        message_type: Option<String>,
    ) -> Result<Value, CoreError> {
        let message_type = message_type
            .ok_or_else(|| CoreError::invalid_input("The provided input has no type attribute"))?;

        let entry = self
            .handlers
            .get(&message_type)
            .map(|entry| entry.clone())
            .ok_or_else(|| CoreError::NotFound {
                message: "Route handler not found".to_string(),
                details: Some(serde_json::json!({ "type": message_type })),
                source: None,
            })?;

        let validated = match entry.schema.validate(msg) {
            ValidationOutcome::Valid(value) => value,
            ValidationOutcome::Invalid(issues) => {
                return Err(CoreError::from_schema_issues(issues));
            }
        };

        (entry.handler)(validated).await
    }
}
