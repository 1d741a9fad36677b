//! Router configuration: which observability adapters to use, and whether
//! to call the input/output logging hooks the routing algorithm allows for.

use std::sync::Arc;

use crate::logger::{Logger, TracingLogger};
use crate::observability::{Meter, MetricsMeter, Tracer, TracingTracer};

/// Construction options for a [`crate::router::MessageRouter`].
#[derive(Clone)]
pub struct RouterOptions {
    pub(crate) tracer: Arc<dyn Tracer>,
    pub(crate) meter: Arc<dyn Meter>,
    pub(crate) logger: Arc<dyn Logger>,
    pub(crate) log_input: bool,
    pub(crate) log_output: bool,
}

impl std::fmt::Debug for RouterOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterOptions")
            .field("log_input", &self.log_input)
            .field("log_output", &self.log_output)
            .finish_non_exhaustive()
    }
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            tracer: Arc::new(TracingTracer),
            meter: Arc::new(MetricsMeter),
            logger: Arc::new(TracingLogger),
            log_input: false,
            log_output: false,
        }
    }
}

impl RouterOptions {
    /// Starts from the default adapters.
    #[must_use]
    pub fn builder() -> RouterOptionsBuilder {
        RouterOptionsBuilder::default()
    }

    /// A development preset: logs every input and output, useful while
    /// writing and debugging handlers.
    #[must_use]
    pub fn development() -> Self {
        Self {
            log_input: true,
            log_output: true,
            ..Self::default()
        }
    }

    /// A production preset: relies on span/metric instrumentation rather
    /// than per-message input/output logs.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }
}

/// Builder for [`RouterOptions`].
#[derive(Clone)]
pub struct RouterOptionsBuilder {
    inner: RouterOptions,
}

impl Default for RouterOptionsBuilder {
    fn default() -> Self {
        Self {
            inner: RouterOptions::default(),
        }
    }
}

impl RouterOptionsBuilder {
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
    pub fn log_input(mut self, log_input: bool) -> Self {
        self.inner.log_input = log_input;
        self
    }

    #[must_use]
    pub fn log_output(mut self, log_output: bool) -> Self {
        self.inner.log_output = log_output;
        self
    }

    #[must_use]
    pub fn build(self) -> RouterOptions {
        self.inner
    }
}
