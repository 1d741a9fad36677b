//! Error taxonomy for the messaging core
//!
//! A closed set of error kinds, each with a status-code affinity borrowed from
//! HTTP semantics even though nothing here speaks HTTP. Transport adapters map
//! these to wire-level responses; the core only needs the taxonomy.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validator::SchemaIssue;

/// Error surfaced by the router or event bus.
///
/// Variants mirror the status-code affinities in the observability contract:
/// `InvalidInput` (400), `Unauthorized` (401, reserved for transport
/// adapters), `Forbidden` (403, reserved for transport adapters), `NotFound`
/// (404), `Generic` (500).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing `type` attribute, schema validation failure, or a validator's
    /// own rejection.
    #[error("{message}")]
    InvalidInput {
        /// Human-readable summary.
        message: String,
        /// Structured detail payload, e.g. `{"issues": [...]}`.
        details: Option<serde_json::Value>,
        /// Underlying cause, if this wraps a foreign error.
        #[source]
        source: Option<BoxError>,
    },

    /// Reserved for transport adapters; the core never raises this itself.
    #[error("{message}")]
    Unauthorized {
        /// Human-readable summary.
        message: String,
        /// Structured detail payload.
        details: Option<serde_json::Value>,
        /// Underlying cause, if this wraps a foreign error.
        #[source]
        source: Option<BoxError>,
    },

    /// Reserved for transport adapters; the core never raises this itself.
    #[error("{message}")]
    Forbidden {
        /// Human-readable summary.
        message: String,
        /// Structured detail payload.
        details: Option<serde_json::Value>,
        /// Underlying cause, if this wraps a foreign error.
        #[source]
        source: Option<BoxError>,
    },

    /// No handler registered for the dispatched message type.
    #[error("{message}")]
    NotFound {
        /// Human-readable summary.
        message: String,
        /// Structured detail payload.
        details: Option<serde_json::Value>,
        /// Underlying cause, if this wraps a foreign error.
        #[source]
        source: Option<BoxError>,
    },

    /// Event size exceeded the CloudEvents cap, retries exhausted, or a
    /// fallback wrapping of a foreign error with no more specific kind.
    #[error("{message}")]
    Generic {
        /// Human-readable summary.
        message: String,
        /// Structured detail payload.
        details: Option<serde_json::Value>,
        /// Underlying cause, if this wraps a foreign error.
        #[source]
        source: Option<BoxError>,
    },
}

/// A boxed, thread-safe, `'static` error — the shape `#[source]` needs when
/// the underlying cause isn't known until runtime.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

impl CoreError {
    /// The HTTP-style status code a transport adapter would map this to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::Generic { .. } => 500,
        }
    }

    /// The taxonomy name, used as a metric/log label (`"InvalidInput"`, …).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "InvalidInput",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::Forbidden { .. } => "Forbidden",
            Self::NotFound { .. } => "NotFound",
            Self::Generic { .. } => "Generic",
        }
    }

    /// The structured detail payload, if any.
    #[must_use]
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::InvalidInput { details, .. }
            | Self::Unauthorized { details, .. }
            | Self::Forbidden { details, .. }
            | Self::NotFound { details, .. }
            | Self::Generic { details, .. } => details.as_ref(),
        }
    }

    /// Builds an `InvalidInput` with no details attached.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Builds a `NotFound` with no details attached.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Builds a `Generic` with a structured detail payload.
    #[must_use]
    pub fn generic_with_details(message: impl Into<String>, details: serde_json::Value) -> Self {
        Self::Generic {
            message: message.into(),
            details: Some(details),
            source: None,
        }
    }

    /// Adapts a validator's issue list into an `InvalidInput` whose
    /// `details.issues` equals the issue list, per the routing algorithm's
    /// validation-failure step.
    #[must_use]
    pub fn from_schema_issues(issues: Vec<SchemaIssue>) -> Self {
        Self::InvalidInput {
            message: "The provided input is invalid".to_string(),
            details: Some(serde_json::json!({ "issues": issues })),
            source: None,
        }
    }

    /// Wraps a foreign error into this taxonomy, adopting its display string
    /// as the message and keeping it as the source for debugging, while the
    /// caller still chooses which kind (`InvalidInput`, `Generic`, …) to
    /// surface it as.
    pub fn from_error<E>(kind: CoreErrorKind, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let message = err.to_string();
        let source = Some(Box::new(err) as BoxError);
        match kind {
            CoreErrorKind::InvalidInput => Self::InvalidInput {
                message,
                details: None,
                source,
            },
            CoreErrorKind::Unauthorized => Self::Unauthorized {
                message,
                details: None,
                source,
            },
            CoreErrorKind::Forbidden => Self::Forbidden {
                message,
                details: None,
                source,
            },
            CoreErrorKind::NotFound => Self::NotFound {
                message,
                details: None,
                source,
            },
            CoreErrorKind::Generic => Self::Generic {
                message,
                details: None,
                source,
            },
        }
    }
}

/// Tag used to pick which `CoreError` variant `from_error` should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoreErrorKind {
    /// See [`CoreError::InvalidInput`].
    InvalidInput,
    /// See [`CoreError::Unauthorized`].
    Unauthorized,
    /// See [`CoreError::Forbidden`].
    Forbidden,
    /// See [`CoreError::NotFound`].
    NotFound,
    /// See [`CoreError::Generic`].
    Generic,
}

impl fmt::Display for CoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::InvalidInput => "InvalidInput",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "NotFound",
            Self::Generic => "Generic",
        })
    }
}
