//! The three message shapes (`Command`, `Query`, `Event`) and the CloudEvents
//! attributes they share.
//!
//! Commands and queries are handed to the [`crate::router`] as loosely typed
//! JSON — the router's schema is chosen by the registered message `type`, not
//! known at compile time, so [`Command::into_json`] / [`Query::into_json`]
//! are the bridge into that world. Events are strongly typed end to end
//! because the event bus never validates against a per-type schema; it only
//! needs to read `type`/`source`/`id` and measure the serialized size.

use nutype::nutype;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::factory::{NewEvent, NewMessage};
use super::primitives::{AbsoluteUri, MimeMediaType, Rfc3339Time, UriReference};

/// `specversion`: always `"1.0"`; any other value is rejected at
/// construction.
#[nutype(
    validate(predicate = |s: &str| s == "1.0"),
    derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Display, AsRef)
)]
pub struct SpecVersion(String);

impl Default for SpecVersion {
    fn default() -> Self {
        Self::try_new("1.0").expect("\"1.0\" is the only valid specversion")
    }
}

/// `id`: a non-empty, globally-unique-per-message string. Factories default
/// this to a 26-character ULID, sortable and monotonic within a millisecond.
#[nutype(
    validate(len_char_min = 1),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef)
)]
pub struct MessageId(String);

impl MessageId {
    /// Generates a new sortable, lexicographically-ordered id.
    #[must_use]
    pub fn generate() -> Self {
        Self::try_new(ulid::Ulid::new().to_string()).expect("ulid output is never empty")
    }
}

/// `correlationid`: links a causal chain of messages. Factories default this
/// to a fresh id; [`Command::correlated_with`] and friends propagate an
/// existing one instead.
#[nutype(
    validate(len_char_min = 1),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef)
)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generates a new correlation id.
    #[must_use]
    pub fn generate() -> Self {
        Self::try_new(ulid::Ulid::new().to_string()).expect("ulid output is never empty")
    }
}

/// `subject`: required for events, optional for commands, absent for
/// queries.
#[nutype(
    validate(len_char_min = 1),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef)
)]
pub struct Subject(String);

/// The `data` payload: a JSON object, string, number, array, or boolean.
/// `null` is rejected — every message carries data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct MessageData(Value);

/// Raised when a `null` JSON value is used where message data is required.
#[derive(Debug, Clone, thiserror::Error)]
#[error("message data must not be null")]
pub struct NullMessageDataError;

impl TryFrom<Value> for MessageData {
    type Error = NullMessageDataError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        if value.is_null() {
            Err(NullMessageDataError)
        } else {
            Ok(Self(value))
        }
    }
}

impl From<MessageData> for Value {
    fn from(data: MessageData) -> Self {
        data.0
    }
}

impl MessageData {
    /// Borrows the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// An imperative write, dispatched to exactly one handler by [`crate::router`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub specversion: SpecVersion,
    pub id: MessageId,
    pub source: UriReference,
    #[serde(rename = "type")]
    pub message_type: String,
    pub correlationid: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Rfc3339Time>,
    pub data: MessageData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<MimeMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataschema: Option<AbsoluteUri>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<Subject>,
    /// Unrecognized top-level attributes, preserved so schemas that operate
    /// in non-strict mode can still see them.
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// A read, dispatched to exactly one handler by [`crate::router`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    pub specversion: SpecVersion,
    pub id: MessageId,
    pub source: UriReference,
    #[serde(rename = "type")]
    pub message_type: String,
    pub correlationid: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Rfc3339Time>,
    pub data: MessageData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<MimeMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataschema: Option<AbsoluteUri>,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

/// A fact about something that happened, fanned out to every subscriber of
/// its `type` by the [`crate::event_bus`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub specversion: SpecVersion,
    pub id: MessageId,
    pub source: UriReference,
    #[serde(rename = "type")]
    pub event_type: String,
    pub correlationid: CorrelationId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<Rfc3339Time>,
    pub data: MessageData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datacontenttype: Option<MimeMediaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataschema: Option<AbsoluteUri>,
    pub subject: Subject,
    #[serde(flatten)]
    pub extensions: Map<String, Value>,
}

impl Command {
    /// Starts a fluent builder over [`create_command`](super::create_command),
    /// for call sites that need to set `subject`, `dataschema`, or an
    /// explicit `time`/`id` before defaulting. Finish with
    /// [`NewMessage::build_command`].
    #[must_use]
    pub fn builder(
        source: UriReference,
        message_type: impl Into<String>,
        data: MessageData,
    ) -> NewMessage {
        NewMessage::new(source, message_type, data)
    }

    /// Converts to the JSON envelope the router validates and routes.
    ///
    /// # Panics
    /// Panics only if serialization of an already-valid message fails, which
    /// would indicate a bug in the domain types themselves.
    #[must_use]
    pub fn into_json(self) -> Value {
        serde_json::to_value(self).expect("Command always serializes to a JSON object")
    }

    /// Derives a new command that inherits `parent`'s correlation id, for
    /// building out a causal chain.
    #[must_use]
    pub fn correlated_with(mut self, parent_correlation_id: &CorrelationId) -> Self {
        self.correlationid = parent_correlation_id.clone();
        self
    }
}

impl Query {
    /// Starts a fluent builder over [`create_query`](super::create_query).
    /// Finish with [`NewMessage::build_query`]. Queries never carry a
    /// `subject`, so [`NewMessage::with_subject`] is a no-op call site
    /// shouldn't reach for here.
    #[must_use]
    pub fn builder(
        source: UriReference,
        message_type: impl Into<String>,
        data: MessageData,
    ) -> NewMessage {
        NewMessage::new(source, message_type, data)
    }

    /// Converts to the JSON envelope the router validates and routes.
    ///
    /// # Panics
    /// Panics only if serialization of an already-valid message fails, which
    /// would indicate a bug in the domain types themselves.
    #[must_use]
    pub fn into_json(self) -> Value {
        serde_json::to_value(self).expect("Query always serializes to a JSON object")
    }

    /// Derives a new query that inherits `parent`'s correlation id.
    #[must_use]
    pub fn correlated_with(mut self, parent_correlation_id: &CorrelationId) -> Self {
        self.correlationid = parent_correlation_id.clone();
        self
    }
}

impl Event {
    /// Starts a fluent builder over [`create_event`](super::create_event).
    /// Unlike commands and queries, `subject` has no default and must be
    /// supplied here. Finish with [`NewEvent::build`].
    #[must_use]
    pub fn builder(
        source: UriReference,
        event_type: impl Into<String>,
        data: MessageData,
        subject: Subject,
    ) -> NewEvent {
        NewEvent::new(source, event_type, data, subject)
    }

    /// Derives a new event that inherits `parent`'s correlation id.
    #[must_use]
    pub fn correlated_with(mut self, parent_correlation_id: &CorrelationId) -> Self {
        self.correlationid = parent_correlation_id.clone();
        self
    }

    /// The serialized, UTF-8 byte length of this event — what the event bus
    /// compares against the 64 KiB cap.
    ///
    /// # Panics
    /// Panics only if serialization of an already-valid event fails, which
    /// would indicate a bug in the domain types themselves.
    #[must_use]
    pub fn serialized_size_bytes(&self) -> usize {
        serde_json::to_vec(self)
            .expect("Event always serializes to JSON")
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_data_rejects_null() {
        assert!(MessageData::try_from(Value::Null).is_err());
        assert!(MessageData::try_from(serde_json::json!({"a": 1})).is_ok());
    }

    #[test]
    fn command_builder_sets_subject_before_defaulting_the_rest() {
        let command = Command::builder(
            UriReference::try_new("https://x/api").unwrap(),
            "test.command",
            MessageData::try_from(serde_json::json!({"aNumber": 1})).unwrap(),
        )
        .with_subject(Subject::try_new("order-42").unwrap())
        .build_command();

        assert_eq!(command.subject.map(|s| s.to_string()), Some("order-42".to_string()));
        assert!(!command.id.as_ref().is_empty());
    }

    #[test]
    fn event_builder_requires_subject_up_front() {
        let event = Event::builder(
            UriReference::try_new("https://x/api").unwrap(),
            "test.event",
            MessageData::try_from(serde_json::json!({"aNumber": 1})).unwrap(),
            Subject::try_new("order-42").unwrap(),
        )
        .build();

        assert_eq!(event.subject.to_string(), "order-42");
    }

    #[test]
    fn command_into_json_preserves_unknown_extensions() {
        let mut extensions = Map::new();
        extensions.insert("partitionkey".to_string(), serde_json::json!("tenant-1"));
        let command = Command {
            specversion: SpecVersion::default(),
            id: MessageId::generate(),
            source: UriReference::try_new("https://x/api").unwrap(),
            message_type: "test.command".to_string(),
            correlationid: CorrelationId::generate(),
            time: None,
            data: MessageData::try_from(serde_json::json!({"aNumber": 1})).unwrap(),
            datacontenttype: None,
            dataschema: None,
            subject: None,
            extensions,
        };
        let json = command.into_json();
        assert_eq!(json["partitionkey"], serde_json::json!("tenant-1"));
        assert_eq!(json["type"], serde_json::json!("test.command"));
    }
}
