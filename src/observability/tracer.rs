//! The `Tracer` capability and its default `tracing`-backed adapter.

use std::time::Instant;

use tracing::Instrument as _;

/// OpenTelemetry-style span kind, carried through to whichever tracing
/// backend is wired up at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    /// In-process work with no external counterpart (`router.route`).
    Internal,
    /// Produces a message for others to consume (`eventbus.publish`).
    Producer,
    /// Consumes a message produced elsewhere (`eventbus.handle`).
    Consumer,
}

impl SpanKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::Producer => "producer",
            Self::Consumer => "consumer",
        }
    }
}

/// The attribute set the observability contract (spec.md §6) assigns to
/// router and event-bus spans. Every field is optional because router spans
/// and event-bus spans populate a different subset — in particular,
/// `router_name` and `eventbus_name` are distinct attribute keys, never the
/// same generic "instance name" field, because downstream dashboards key on
/// the specific name spec.md §6 assigns each component.
#[derive(Debug, Clone, Default)]
pub struct SpanAttributes {
    /// `messaging.system`: `"nimbusRouter"` or `"nimbusEventBus"`.
    pub messaging_system: Option<&'static str>,
    /// `messaging.router_name`, router spans only.
    pub router_name: Option<String>,
    /// `messaging.eventbus_name`, event-bus spans only.
    pub eventbus_name: Option<String>,
    /// `messaging.operation`: `"route"`, `"publish"`, or `"process"`.
    pub operation: Option<&'static str>,
    /// `messaging.destination`: the message/event type.
    pub destination: Option<String>,
    /// `correlation_id`, present only when the message carries one.
    pub correlation_id: Option<String>,
    /// `cloudevents.event_id`, events only.
    pub event_id: Option<String>,
    /// `cloudevents.event_source`, events only.
    pub event_source: Option<String>,
}

/// A capability for starting spans, decoupling the router and event bus
/// from any one tracing SDK.
pub trait Tracer: Send + Sync {
    /// Starts a span. The returned [`ActiveSpan`] is not yet entered; wrap
    /// the operation's future in it via [`ActiveSpan::instrument`].
    fn start_span(&self, name: &'static str, kind: SpanKind, attrs: &SpanAttributes)
        -> ActiveSpan;
}

/// A span in progress, together with the instant it was opened (used to
/// compute the duration histograms observe).
pub struct ActiveSpan {
    span: tracing::Span,
    opened_at: Instant,
}

impl ActiveSpan {
    /// The instant this span was opened.
    #[must_use]
    pub fn opened_at(&self) -> Instant {
        self.opened_at
    }

    /// Time elapsed since this span was opened.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.opened_at.elapsed()
    }

    /// Runs `f` with this span as the current span — for the synchronous
    /// portions of an operation (logging, recording events).
    pub fn in_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.span.in_scope(f)
    }

    /// Wraps `future` so it executes with this span active for its entire
    /// lifetime, including every `.await` point. This is how the router and
    /// event bus keep a span open across an asynchronous handler call. The
    /// span handle itself is cheap to clone, so `self` stays usable
    /// afterwards for [`ActiveSpan::record_error`] and [`ActiveSpan::elapsed`].
    pub fn instrument<F: std::future::Future>(&self, future: F) -> tracing::instrument::Instrumented<F> {
        future.instrument(self.span.clone())
    }

    /// Marks this span as failed and records the error's display string.
    pub fn record_error(&self, err: &(dyn std::error::Error + 'static)) {
        self.span.in_scope(|| {
            tracing::error!(error = %err, "operation failed");
        });
    }

    /// Adds a `retry { attempt, delay_ms }` span event, per the subscriber
    /// task algorithm's retry step.
    pub fn record_retry(&self, attempt: u32, delay_ms: u64) {
        self.span.in_scope(|| {
            tracing::info!(attempt, delay_ms, "retry");
        });
    }
}

/// The default [`Tracer`], backing onto the `tracing` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingTracer;

impl Tracer for TracingTracer {
    fn start_span(
        &self,
        name: &'static str,
        kind: SpanKind,
        attrs: &SpanAttributes,
    ) -> ActiveSpan {
        let span = tracing::span!(
            tracing::Level::INFO,
            name,
            "otel.kind" = kind.as_str(),
            "messaging.system" = attrs.messaging_system.unwrap_or_default(),
            "messaging.router_name" = attrs.router_name.as_deref(),
            "messaging.eventbus_name" = attrs.eventbus_name.as_deref(),
            "messaging.operation" = attrs.operation.unwrap_or_default(),
            "messaging.destination" = attrs.destination.as_deref().unwrap_or_default(),
            correlation_id = attrs.correlation_id.as_deref(),
            "cloudevents.event_id" = attrs.event_id.as_deref(),
            "cloudevents.event_source" = attrs.event_source.as_deref(),
        );
        ActiveSpan {
            span,
            opened_at: Instant::now(),
        }
    }
}
