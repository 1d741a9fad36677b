//! Schema primitives shared by every CloudEvents attribute that isn't a bare
//! string: URI-references, absolute URIs, RFC 3339 timestamps, and MIME media
//! types. Each is a `nutype`-validated newtype so an invalid value can never
//! be constructed, matching how the rest of the domain model avoids
//! primitive obsession.

use nutype::nutype;
use serde::{Deserialize, Serialize};

/// `source` and similar CloudEvents attributes: RFC 3986 §4.1 URI-reference.
/// Accepts an absolute URI or a relative reference; rejects the empty
/// string.
#[nutype(
    validate(predicate = |s: &str| is_uri_reference(s)),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef, TryFrom, Into)
)]
pub struct UriReference(String);

/// `dataschema`: must parse as a full, absolute URI.
#[nutype(
    validate(predicate = |s: &str| url::Url::parse(s).is_ok()),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef, TryFrom, Into)
)]
pub struct AbsoluteUri(String);

/// `time`: `YYYY-MM-DDTHH:MM:SS[.fff]{Z|±HH:MM}`, rejecting invalid calendar
/// dates (e.g. Feb 30).
#[nutype(
    validate(predicate = |s: &str| chrono::DateTime::parse_from_rfc3339(s).is_ok()),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef, TryFrom, Into)
)]
pub struct Rfc3339Time(String);

/// `datacontenttype`: `type/subtype[; param=value…]` per RFC 2046, with
/// `type` restricted to the discrete/composite set or an `x-…` extension.
#[nutype(
    validate(predicate = |s: &str| is_mime_media_type(s)),
    derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRef, TryFrom, Into)
)]
pub struct MimeMediaType(String);

const RECOGNIZED_TOP_LEVEL_TYPES: &[&str] = &[
    "text",
    "image",
    "audio",
    "video",
    "application",
    "message",
    "multipart",
];

fn is_mime_media_type(s: &str) -> bool {
    let Ok(m) = s.parse::<mime::Mime>() else {
        return false;
    };
    let top_level = m.type_().as_str();
    RECOGNIZED_TOP_LEVEL_TYPES.contains(&top_level) || top_level.starts_with("x-")
}

fn is_uri_reference(s: &str) -> bool {
    if s.is_empty() || s.chars().any(char::is_whitespace) {
        return false;
    }
    if url::Url::parse(s).is_ok() {
        return true;
    }
    // Relative-reference grammar (RFC 3986 §4.2) without a scheme: resolve
    // against a fixed base and accept it if the result parses cleanly.
    url::Url::parse("http://nimbus.invalid/")
        .and_then(|base| base.join(s))
        .is_ok()
}

impl Rfc3339Time {
    /// The current instant, formatted as RFC 3339 with second precision.
    #[must_use]
    pub fn now() -> Self {
        Self::try_new(chrono::Utc::now().to_rfc3339()).expect("chrono output is always RFC 3339")
    }
}

impl MimeMediaType {
    /// The default content type factories assign when none is supplied.
    #[must_use]
    pub fn application_json() -> Self {
        Self::try_new("application/json").expect("literal is a valid MIME type")
    }
}
