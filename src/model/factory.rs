//! Factory functions that fill in CloudEvents defaults.
//!
//! `create_command`, `create_query`, and `create_event` never validate the
//! `data` payload — that happens at the router's dispatch boundary, not
//! here. They only guarantee that `specversion`, `id`, `correlationid`,
//! `time`, and `datacontenttype` are populated.

use serde_json::{Map, Value};

use super::message::{
    Command, CorrelationId, Event, MessageData, MessageId, Query, SpecVersion, Subject,
};
use super::primitives::{AbsoluteUri, MimeMediaType, Rfc3339Time, UriReference};

/// Caller-supplied fields for [`create_command`] and [`create_query`].
/// Everything not listed here is filled in by the factory.
pub struct NewMessage {
    pub source: UriReference,
    pub message_type: String,
    pub data: MessageData,
    pub id: Option<MessageId>,
    pub correlationid: Option<CorrelationId>,
    pub time: Option<Rfc3339Time>,
    pub datacontenttype: Option<MimeMediaType>,
    pub dataschema: Option<AbsoluteUri>,
    pub subject: Option<Subject>,
    pub extensions: Map<String, Value>,
}

impl NewMessage {
    /// Starts a new input with only the required fields set.
    #[must_use]
    pub fn new(source: UriReference, message_type: impl Into<String>, data: MessageData) -> Self {
        Self {
            source,
            message_type: message_type.into(),
            data,
            id: None,
            correlationid: None,
            time: None,
            datacontenttype: None,
            dataschema: None,
            subject: None,
            extensions: Map::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlationid: CorrelationId) -> Self {
        self.correlationid = Some(correlationid);
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: Rfc3339Time) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, datacontenttype: MimeMediaType) -> Self {
        self.datacontenttype = Some(datacontenttype);
        self
    }

    #[must_use]
    pub fn with_data_schema(mut self, dataschema: AbsoluteUri) -> Self {
        self.dataschema = Some(dataschema);
        self
    }

    #[must_use]
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }
}

/// Caller-supplied fields for [`create_event`]. `subject` has no default —
/// events require it as input.
pub struct NewEvent {
    pub source: UriReference,
    pub event_type: String,
    pub data: MessageData,
    pub subject: Subject,
    pub id: Option<MessageId>,
    pub correlationid: Option<CorrelationId>,
    pub time: Option<Rfc3339Time>,
    pub datacontenttype: Option<MimeMediaType>,
    pub dataschema: Option<AbsoluteUri>,
    pub extensions: Map<String, Value>,
}

impl NewEvent {
    /// Starts a new input with only the required fields set.
    #[must_use]
    pub fn new(
        source: UriReference,
        event_type: impl Into<String>,
        data: MessageData,
        subject: Subject,
    ) -> Self {
        Self {
            source,
            event_type: event_type.into(),
            data,
            subject,
            id: None,
            correlationid: None,
            time: None,
            datacontenttype: None,
            dataschema: None,
            extensions: Map::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlationid: CorrelationId) -> Self {
        self.correlationid = Some(correlationid);
        self
    }

    #[must_use]
    pub fn with_time(mut self, time: Rfc3339Time) -> Self {
        self.time = Some(time);
        self
    }

    #[must_use]
    pub fn with_content_type(mut self, datacontenttype: MimeMediaType) -> Self {
        self.datacontenttype = Some(datacontenttype);
        self
    }

    #[must_use]
    pub fn with_data_schema(mut self, dataschema: AbsoluteUri) -> Self {
        self.dataschema = Some(dataschema);
        self
    }
}

/// Fills in `specversion`, `id`, `correlationid`, `time`, and
/// `datacontenttype` where the caller left them unset, producing a command
/// ready to route.
#[must_use]
pub fn create_command(input: NewMessage) -> Command {
    Command {
        specversion: SpecVersion::default(),
        id: input.id.unwrap_or_else(MessageId::generate),
        source: input.source,
        message_type: input.message_type,
        correlationid: input.correlationid.unwrap_or_else(CorrelationId::generate),
        time: Some(input.time.unwrap_or_else(Rfc3339Time::now)),
        data: input.data,
        datacontenttype: Some(
            input
                .datacontenttype
                .unwrap_or_else(MimeMediaType::application_json),
        ),
        dataschema: input.dataschema,
        subject: input.subject,
        extensions: input.extensions,
    }
}

/// Fills in defaults exactly as [`create_command`] does; queries never carry
/// a `subject`.
#[must_use]
pub fn create_query(input: NewMessage) -> Query {
    Query {
        specversion: SpecVersion::default(),
        id: input.id.unwrap_or_else(MessageId::generate),
        source: input.source,
        message_type: input.message_type,
        correlationid: input.correlationid.unwrap_or_else(CorrelationId::generate),
        time: Some(input.time.unwrap_or_else(Rfc3339Time::now)),
        data: input.data,
        datacontenttype: Some(
            input
                .datacontenttype
                .unwrap_or_else(MimeMediaType::application_json),
        ),
        dataschema: input.dataschema,
        extensions: input.extensions,
    }
}

/// Fills in defaults exactly as [`create_command`] does; `subject` is
/// required input, never defaulted.
#[must_use]
pub fn create_event(input: NewEvent) -> Event {
    Event {
        specversion: SpecVersion::default(),
        id: input.id.unwrap_or_else(MessageId::generate),
        source: input.source,
        event_type: input.event_type,
        correlationid: input.correlationid.unwrap_or_else(CorrelationId::generate),
        time: Some(input.time.unwrap_or_else(Rfc3339Time::now)),
        data: input.data,
        datacontenttype: Some(
            input
                .datacontenttype
                .unwrap_or_else(MimeMediaType::application_json),
        ),
        dataschema: input.dataschema,
        subject: input.subject,
        extensions: input.extensions,
    }
}

impl NewMessage {
    /// Finishes the builder as a [`Command`], filling defaults via
    /// [`create_command`].
    #[must_use]
    pub fn build_command(self) -> Command {
        create_command(self)
    }

    /// Finishes the builder as a [`Query`], filling defaults via
    /// [`create_query`].
    #[must_use]
    pub fn build_query(self) -> Query {
        create_query(self)
    }
}

impl NewEvent {
    /// Finishes the builder as an [`Event`], filling defaults via
    /// [`create_event`].
    #[must_use]
    pub fn build(self) -> Event {
        create_event(self)
    }
}
