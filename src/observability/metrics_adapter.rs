//! The `Meter` capability and its default `metrics`-backed adapter.

/// A capability for creating counters and histograms, decoupling the router
/// and event bus from any one metrics SDK. Handles for a given metric name
/// are created once and reused, per spec.md §5's resource model.
pub trait Meter: Send + Sync {
    /// Returns a handle for the named counter.
    fn counter(&self, name: &'static str) -> Counter;
    /// Returns a handle for the named histogram.
    fn histogram(&self, name: &'static str) -> Histogram;
}

/// A label attached to a counter or histogram observation.
pub type Label = (&'static str, String);

/// A counter handle, incremented once per observation.
#[derive(Debug, Clone, Copy)]
pub struct Counter {
    name: &'static str,
}

impl Counter {
    /// Increments the counter by `value`, tagged with `labels`.
    pub fn increment(&self, value: u64, labels: &[Label]) {
        let labels: Vec<metrics::Label> = labels
            .iter()
            .map(|(key, value)| metrics::Label::new(*key, value.clone()))
            .collect();
        metrics::counter!(self.name, labels).increment(value);
    }
}

/// A histogram handle, recorded once per observation.
#[derive(Debug, Clone, Copy)]
pub struct Histogram {
    name: &'static str,
}

impl Histogram {
    /// Records `value`, tagged with `labels`.
    pub fn record(&self, value: f64, labels: &[Label]) {
        let labels: Vec<metrics::Label> = labels
            .iter()
            .map(|(key, value)| metrics::Label::new(*key, value.clone()))
            .collect();
        metrics::histogram!(self.name, labels).record(value);
    }
}

/// The default [`Meter`], backing onto the `metrics` crate's global
/// recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsMeter;

impl Meter for MetricsMeter {
    fn counter(&self, name: &'static str) -> Counter {
        Counter { name }
    }

    fn histogram(&self, name: &'static str) -> Histogram {
        Histogram { name }
    }
}
