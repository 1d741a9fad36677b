//! The event bus: async, in-process publish/subscribe with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use rand::Rng;

use crate::error::CoreError;
use crate::logger::LogRecord;
use crate::model::Event;
use crate::observability::{ActiveSpan, SpanAttributes, SpanKind};

use super::config::EventBusOptions;
use super::subscription::Subscription;

/// The 64 KiB CloudEvents size cap the publish algorithm enforces (spec.md
/// §4.E step 1).
pub const MAX_EVENT_SIZE_BYTES: usize = 65_536;

/// A named, type-keyed event bus. Cloning is cheap — it shares the
/// subscription table and observability adapters.
#[derive(Clone)]
pub struct EventBus {
    name: String,
    subscriptions: Arc<DashMap<String, Vec<Subscription>>>,
    options: EventBusOptions,
}

impl EventBus {
    /// Creates a bus with the given name and the default observability
    /// adapters and retry policy.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, EventBusOptions::default())
    }

    /// Creates a bus with explicit options.
    #[must_use]
    pub fn with_options(name: impl Into<String>, options: EventBusOptions) -> Self {
        Self {
            name: name.into(),
            subscriptions: Arc::new(DashMap::new()),
            options,
        }
    }

    /// This bus instance's name, as used in the `messaging.eventbus_name`
    /// span attribute and the `eventbus_name` metric label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends a subscription for `event_type`. Multiple subscriptions per
    /// type are allowed; there is no `unsubscribe` (spec.md §4.E Non-goal
    /// mirrored at the router via `register`'s own silent-replace policy).
    pub fn subscribe_event(&self, event_type: impl Into<String>, subscription: Subscription) {
        let event_type = event_type.into();
        self.subscriptions
            .entry(event_type.clone())
            .or_default()
            .push(subscription);
        self.options.logger.info(
            LogRecord::new(format!("Subscribed to event type \"{event_type}\""))
                .with_category("event_bus")
                .with_data(serde_json::json!({
                    "eventbus_name": self.name,
                    "event_type": event_type,
                })),
        );
    }

    /// Publishes `event`: validates the size cap, schedules every matching
    /// subscriber concurrently, and returns once scheduling is done — not
    /// once subscribers finish (spec.md §4.E `putEvent`).
    pub async fn put_event(&self, event: Event) -> Result<(), CoreError> {
        let size = event.serialized_size_bytes();
        if size > MAX_EVENT_SIZE_BYTES {
            return Err(CoreError::Generic {
                message: "Event size exceeds the limit of 64KB".to_string(),
                details: Some(serde_json::json!({
                    "eventType": event.event_type,
                    "eventSource": event.source.to_string(),
                    "eventSizeBytes": size,
                    "maxSizeBytes": MAX_EVENT_SIZE_BYTES,
                })),
                source: None,
            });
        }

        let attrs = SpanAttributes {
            messaging_system: Some("nimbusEventBus"),
            eventbus_name: Some(self.name.clone()),
            operation: Some("publish"),
            destination: Some(event.event_type.clone()),
            correlation_id: Some(event.correlationid.to_string()),
            event_id: Some(event.id.to_string()),
            event_source: Some(event.source.to_string()),
        };
        let span = self
            .options
            .tracer
            .start_span("eventbus.publish", SpanKind::Producer, &attrs);

        let labels: Vec<(&'static str, String)> = vec![
            ("eventbus_name", self.name.clone()),
            ("event_type", event.event_type.clone()),
        ];
        self.options
            .meter
            .counter("eventbus_events_published_total")
            .increment(1, &labels);
        self.options
            .meter
            .histogram("eventbus_event_size_bytes")
            .record(size as f64, &labels);

        if self.options.log_publish {
            self.options.logger.debug(
                LogRecord::new(format!("Publishing event \"{}\"", event.event_type))
                    .with_category("event_bus")
                    .with_correlation_id(event.correlationid.to_string())
                    .with_data(serde_json::to_value(&event).unwrap_or_default()),
            );
        }

        if let Some(subscriptions) = self.subscriptions.get(&event.event_type) {
            for subscription in subscriptions.iter() {
                let bus = self.clone();
                let event = event.clone();
                let subscription = subscription.clone();
                tokio::spawn(async move {
                    bus.deliver(event, subscription).await;
                });
            }
        }

        drop(span);
        Ok(())
    }

    async fn deliver(&self, event: Event, subscription: Subscription) {
        let attrs = SpanAttributes {
            messaging_system: Some("nimbusEventBus"),
            eventbus_name: Some(self.name.clone()),
            operation: Some("process"),
            destination: Some(event.event_type.clone()),
            correlation_id: Some(event.correlationid.to_string()),
            event_id: Some(event.id.to_string()),
            event_source: Some(event.source.to_string()),
        };
        let span = self
            .options
            .tracer
            .start_span("eventbus.handle", SpanKind::Consumer, &attrs);

        let policy = subscription
            .retry_policy
            .unwrap_or(self.options.default_retry_policy);
        let labels: Vec<(&'static str, String)> = vec![
            ("eventbus_name", self.name.clone()),
            ("event_type", event.event_type.clone()),
        ];

        let mut attempt = 0u32;
        loop {
            let result = span.instrument((subscription.handler)(event.clone())).await;
            match result {
                Ok(()) => {
                    self.emit_delivered(&labels, "success", &span);
                    return;
                }
                Err(err) => {
                    attempt += 1;
                    if attempt > policy.max_retries {
                        self.emit_delivered(&labels, "error", &span);
                        span.record_error(&err);
                        let wrapped = CoreError::Generic {
                            message: format!(
                                "Failed to handle event: {} from {}",
                                event.event_type, event.source
                            ),
                            details: None,
                            source: Some(Box::new(err)),
                        };
                        self.route_to_error_sink(wrapped, event, &subscription);
                        return;
                    }

                    let delay_ms = self.compute_delay(&policy, attempt);
                    self.options
                        .meter
                        .counter("eventbus_retry_attempts_total")
                        .increment(1, &labels);
                    span.record_retry(attempt, delay_ms);
                    if !self.options.time_provider.should_skip_delays() {
                        self.options
                            .time_provider
                            .sleep(Duration::from_millis(delay_ms))
                            .await;
                    }
                }
            }
        }
    }

    fn emit_delivered(&self, labels: &[(&'static str, String)], status: &str, span: &ActiveSpan) {
        let mut labels = labels.to_vec();
        labels.push(("status", status.to_string()));
        self.options
            .meter
            .counter("eventbus_events_delivered_total")
            .increment(1, &labels);
        self.options
            .meter
            .histogram("eventbus_event_handling_duration_seconds")
            .record(span.elapsed().as_secs_f64(), &labels[..2]);
    }

    fn compute_delay(&self, policy: &super::config::RetryPolicy, attempt: u32) -> u64 {
        let base = policy.base_delay_for_attempt(attempt);
        if policy.use_jitter {
            let jitter_fraction = rand::thread_rng().gen_range(0.0..0.1);
            base + (base as f64 * jitter_fraction) as u64
        } else {
            base
        }
    }

    fn route_to_error_sink(&self, err: CoreError, event: Event, subscription: &Subscription) {
        if let Some(on_error) = &subscription.on_error {
            on_error(err, event);
        } else {
            self.options.logger.error(
                LogRecord::new(err.to_string())
                    .with_category("event_bus")
                    .with_error(&err)
                    .with_correlation_id(event.correlationid.to_string())
                    .with_data(serde_json::json!({
                        "eventbus_name": self.name,
                        "event_type": event.event_type,
                    })),
            );
        }
    }
}
