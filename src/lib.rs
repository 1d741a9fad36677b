//! # Nimbus Core
//!
//! An in-process, event-driven messaging core built around the CloudEvents
//! v1.0 data model. Applications declare three kinds of messages —
//! **commands** (imperative writes), **queries** (reads), and **events**
//! (facts about things that happened) — validate them against declared
//! schemas, dispatch them to handlers registered by message `type`, and, for
//! events, fan them out to many asynchronous subscribers with bounded retry
//! and backoff.
//!
//! ## Components
//!
//! - [`model`]: the CloudEvents message shapes and their validation
//!   primitives.
//! - [`router`]: [`router::MessageRouter`], a named, type-keyed dispatch
//!   table for commands and queries.
//! - [`event_bus`]: [`event_bus::EventBus`], an async publish/subscribe
//!   engine for events.
//! - [`registry`]: process-wide named-instance lookup for both.
//! - [`error`]: the closed error taxonomy both components raise.
//! - [`observability`] and [`logger`]: capability traits that decouple the
//!   core from any one tracing, metrics, or logging crate.
//! - [`validator`]: the schema-validation capability the router consults.
//!
//! ## Example
//!
//! ```rust
//! use nimbus_core::model::{create_command, MessageData, NewMessage, UriReference};
//! use nimbus_core::router::MessageRouter;
//! use nimbus_core::validator::ObjectSchema;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let router = MessageRouter::new("default");
//! router.register(
//!     "greet",
//!     Arc::new(|msg: serde_json::Value| {
//!         Box::pin(async move { Ok(serde_json::json!({ "echoed": msg["data"] })) })
//!     }),
//!     Arc::new(ObjectSchema::new(["data"])),
//! );
//!
//! let command = create_command(NewMessage::new(
//!     UriReference::try_new("https://example.com/api").unwrap(),
//!     "greet",
//!     MessageData::try_from(serde_json::json!({ "name": "World" })).unwrap(),
//! ));
//! let result = router.route(command.into_json()).await.unwrap();
//! assert_eq!(result["echoed"]["name"], "World");
//! # }
//! ```

pub mod error;
pub mod event_bus;
pub mod logger;
pub mod model;
pub mod observability;
pub mod registry;
pub mod router;
pub mod time_provider;
pub mod validator;

pub use error::CoreError;
pub use event_bus::EventBus;
pub use registry::Registry;
pub use router::MessageRouter;
