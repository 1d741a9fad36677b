//! An injectable clock, so the event bus's retry/backoff loop can be tested
//! without waiting out real delays.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// A source of time for code that sleeps or measures durations. Production
/// code uses [`RealTimeProvider`]; tests substitute [`MockTimeProvider`] to
/// collapse retry backoff to nothing.
#[async_trait]
pub trait TimeProvider: Send + Sync {
    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);

    /// The current wall-clock time.
    fn now(&self) -> std::time::SystemTime {
        std::time::SystemTime::now()
    }

    /// A monotonic instant, used for span/histogram durations.
    fn instant(&self) -> Instant {
        Instant::now()
    }

    /// When `true`, callers may skip real sleeps entirely (used by the mock
    /// provider so retry-loop tests run instantly while still exercising the
    /// attempt-counting and delay-computation logic).
    fn should_skip_delays(&self) -> bool {
        false
    }
}

/// Shared handle to a [`TimeProvider`], the form the event bus stores.
pub type SharedTimeProvider = Arc<dyn TimeProvider>;

/// The production [`TimeProvider`], backed by `tokio::time::sleep`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeProvider;

#[async_trait]
impl TimeProvider for RealTimeProvider {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// A [`TimeProvider`] for tests: skips real delays while still reporting
/// accurate computed durations to callers that ask.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockTimeProvider;

#[async_trait]
impl TimeProvider for MockTimeProvider {
    async fn sleep(&self, _duration: Duration) {
        tokio::task::yield_now().await;
    }

    fn should_skip_delays(&self) -> bool {
        true
    }
}

/// The default, real-time provider, shared.
#[must_use]
pub fn real() -> SharedTimeProvider {
    Arc::new(RealTimeProvider)
}

/// The mock, delay-skipping provider, shared.
#[must_use]
pub fn mock() -> SharedTimeProvider {
    Arc::new(MockTimeProvider)
}
