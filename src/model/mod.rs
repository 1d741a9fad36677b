//! The CloudEvents v1.0 message model: shared schema primitives, the three
//! message shapes (`Command`, `Query`, `Event`), and the factories that fill
//! in their defaults.

mod factory;
mod message;
mod primitives;

pub use factory::{create_command, create_event, create_query, NewEvent, NewMessage};
pub use message::{
    Command, CorrelationId, Event, MessageData, MessageId, NullMessageDataError, Query,
    SpecVersion, Subject,
};
pub use primitives::{AbsoluteUri, MimeMediaType, Rfc3339Time, UriReference};
