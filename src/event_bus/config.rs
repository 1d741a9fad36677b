//! Event bus configuration: retry policy defaults and construction options.

use std::sync::Arc;

use crate::logger::{Logger, TracingLogger};
use crate::observability::{Meter, MetricsMeter, Tracer, TracingTracer};
use crate::time_provider::{self, SharedTimeProvider};

/// Governs a subscription's capped exponential backoff on handler failure.
///
/// A subscription may override any field; unset fields fall back to the
/// bus's defaults, which in turn default to `maxRetries=2, baseDelayMs=1000,
/// maxDelayMs=30000, useJitter=true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub use_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay_ms: 1_000,
            max_delay_ms: 30_000,
            use_jitter: true,
        }
    }
}

impl RetryPolicy {
    /// The delay before attempt `attempt` (1-based, counted after the
    /// initial failure): `min(base * 2^(attempt-1), max)`, plus up to 10%
    /// jitter when enabled. Jitter is sampled by the caller so this method
    /// stays deterministic and unit-testable on its own.
    #[must_use]
    pub fn base_delay_for_attempt(&self, attempt: u32) -> u64 {
        let scaled = self
            .base_delay_ms
            .saturating_mul(1u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX));
        scaled.min(self.max_delay_ms)
    }
}

/// Construction options for an [`crate::event_bus::EventBus`].
#[derive(Clone)]
pub struct EventBusOptions {
    pub(crate) tracer: Arc<dyn Tracer>,
    pub(crate) meter: Arc<dyn Meter>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) time_provider: SharedTimeProvider,
    pub(crate) default_retry_policy: RetryPolicy,
    pub(crate) log_publish: bool,
}

impl std::fmt::Debug for EventBusOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBusOptions")
            .field("default_retry_policy", &self.default_retry_policy)
            .field("log_publish", &self.log_publish)
            .finish_non_exhaustive()
    }
}

impl Default for EventBusOptions {
    fn default() -> Self {
        Self {
            tracer: Arc::new(TracingTracer),
            meter: Arc::new(MetricsMeter),
            logger: Arc::new(TracingLogger),
            time_provider: time_provider::real(),
            default_retry_policy: RetryPolicy::default(),
            log_publish: false,
        }
    }
}

impl EventBusOptions {
    #[must_use]
    pub fn builder() -> EventBusOptionsBuilder {
        EventBusOptionsBuilder::default()
    }

    /// A development preset: logs every published event, useful while
    /// writing and debugging subscribers.
    #[must_use]
    pub fn development() -> Self {
        Self {
            log_publish: true,
            ..Self::default()
        }
    }

    /// A production preset: relies on span/metric instrumentation rather
    /// than per-event publish logs.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Builder for [`EventBusOptions`].
#[derive(Clone)]
pub struct EventBusOptionsBuilder {
    inner: EventBusOptions,
}

impl Default for EventBusOptionsBuilder {
    fn default() -> Self {
        Self {
            inner: EventBusOptions::default(),
        }
    }
}

impl EventBusOptionsBuilder {
    #[must_use]
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.inner.tracer = tracer;
        self
    }

    #[must_use]
    pub fn meter(mut self, meter: Arc<dyn Meter>) -> Self {
        self.inner.meter = meter;
        self
    }

    #[must_use]
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.inner.logger = logger;
        self
    }

    #[must_use]
    pub fn time_provider(mut self, time_provider: SharedTimeProvider) -> Self {
        self.inner.time_provider = time_provider;
        self
    }

    #[must_use]
    pub fn default_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.inner.default_retry_policy = policy;
        self
    }

    /// Whether `put_event` logs the event being published (spec.md §4.E
    /// publish algorithm step 4, `logPublish(event)`).
    #[must_use]
    pub fn log_publish(mut self, log_publish: bool) -> Self {
        self.inner.log_publish = log_publish;
        self
    }

    #[must_use]
    pub fn build(self) -> EventBusOptions {
        self.inner
    }
}
