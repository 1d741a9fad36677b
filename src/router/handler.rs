//! The handler registry entry type: `(message type) -> { handler, schema }`.

use std::sync::Arc;

use futures::future::BoxFuture;
use serde_json::Value;

use crate::error::CoreError;
use crate::validator::Validator;

/// A command/query handler: takes the schema-validated message and
/// produces a result (or a domain error, propagated unchanged by the
/// router).
pub type HandlerFn = Arc<dyn Fn(Value) -> BoxFuture<'static, Result<Value, CoreError>> + Send + Sync>;

/// One registry entry: the handler plus the schema `route` validates
/// against before invoking it.
#[derive(Clone)]
pub(crate) struct HandlerEntry {
    pub(crate) handler: HandlerFn,
    pub(crate) schema: Arc<dyn Validator>,
}
