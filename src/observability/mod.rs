//! The observability capability: a thin wrapper over a tracing/metrics
//! provider exposing `start_span`, `counter`, and `histogram`.
//!
//! The router and event bus depend only on [`Tracer`] and [`Meter`], never
//! directly on the `tracing` or `metrics` crates — matching spec.md §9's
//! "observability provider as a capability" design note. [`TracingTracer`]
//! and [`MetricsMeter`] are the default adapters, backing onto exactly the
//! SDKs this crate otherwise uses for its own instrumentation.
//!
//! The span names, kinds, attributes, and metric names this module's
//! callers use are a public contract (spec.md §6): changing them is a
//! semver-breaking change, not a refactor.

mod metrics_adapter;
mod tracer;

pub use metrics_adapter::{Counter, Histogram, Meter, MetricsMeter};
pub use tracer::{ActiveSpan, SpanAttributes, SpanKind, Tracer, TracingTracer};
