//! A single subscriber registration for one event type.

use std::sync::Arc;

use futures::future::BoxFuture;

use crate::error::CoreError;
use crate::model::Event;

use super::config::RetryPolicy;

/// A subscriber handler: given the delivered event, do something; failure
/// drives the retry loop.
pub type EventHandlerFn =
    Arc<dyn Fn(Event) -> BoxFuture<'static, Result<(), CoreError>> + Send + Sync>;

/// Invoked once a delivery exhausts its retries, with the wrapped
/// [`CoreError::Generic`] and the event that failed to be handled. Runs in
/// place of the default "log at error level" behavior when supplied.
pub type ErrorSinkFn = Arc<dyn Fn(CoreError, Event) + Send + Sync>;

/// One `subscribeEvent` registration. Order of registration defines
/// scheduling order; delivery itself runs concurrently (spec.md §5).
#[derive(Clone)]
pub struct Subscription {
    pub(crate) handler: EventHandlerFn,
    pub(crate) on_error: Option<ErrorSinkFn>,
    pub(crate) retry_policy: Option<RetryPolicy>,
}

impl Subscription {
    /// A subscription with no error sink or retry override (the bus
    /// defaults apply).
    #[must_use]
    pub fn new(handler: EventHandlerFn) -> Self {
        Self {
            handler,
            on_error: None,
            retry_policy: None,
        }
    }

    #[must_use]
    pub fn with_error_sink(mut self, on_error: ErrorSinkFn) -> Self {
        self.on_error = Some(on_error);
        self
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = Some(retry_policy);
        self
    }
}
