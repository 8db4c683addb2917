//! Error types for the todo API client.
//!
//! # Design
//! `TransportError` describes a failed HTTP exchange and has one variant per
//! way an exchange can fail, so "got a response", "sent but no response" and
//! "never sent" cannot overlap. `ApiError` is what callers receive:
//!
//! - business failures (`code != 0` in a 2xx envelope) carry the translated
//!   message;
//! - transport failures carry the raw `TransportError`, untranslated. The
//!   translated text only goes to the notifier.
//!
//! A 409 arrives as `ApiError::Transport` with status 409 and was not
//! notified; `ApiError::conflict` recovers the server's conflict details.

use serde_json::Value;
use thiserror::Error;

use crate::envelope::VersionConflict;

pub const STATUS_CONFLICT: u16 = 409;

/// A failed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status. `body` is the parsed JSON
    /// body when there was one.
    #[error("request failed with status code {status}")]
    Status { status: u16, body: Option<Value> },

    /// The request went out but no response came back (timeout, refused
    /// connection, dropped stream).
    #[error("no response received: {message}")]
    NoResponse { message: String },

    /// The request could not be built or was rejected before sending.
    #[error("{message}")]
    NeverSent { message: String },
}

impl TransportError {
    /// Failure for a received response; the body is kept if it parses as JSON.
    pub fn from_status(status: u16, body: &str) -> Self {
        TransportError::Status {
            status,
            body: serde_json::from_str(body).ok(),
        }
    }

    pub fn never_sent(message: impl Into<String>) -> Self {
        TransportError::NeverSent {
            message: message.into(),
        }
    }

    pub fn no_response(message: impl Into<String>) -> Self {
        TransportError::NoResponse {
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn has_response(&self) -> bool {
        matches!(self, TransportError::Status { .. })
    }

    /// `message` field of the response body, when present and a string.
    pub fn body_message(&self) -> Option<&str> {
        match self {
            TransportError::Status { body: Some(body), .. } => {
                body.get("message").and_then(Value::as_str)
            }
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.status() == Some(STATUS_CONFLICT)
    }
}

/// Error categories a caller may branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// `code != 0` inside a successful HTTP response.
    Business,
    /// Non-2xx response other than 409.
    ClientRequest,
    /// 409: the write carried a stale version.
    Conflict,
    /// Sent, but no response.
    Network,
    /// Never sent.
    Construction,
    /// A success payload did not have the expected shape.
    Decode,
}

/// Errors returned by `HttpClient` and `TodoApi` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Business failure. `message` is already translated; `code` is `None`
    /// when the 2xx body carried no integer `code`.
    #[error("{message}")]
    Business { code: Option<i64>, message: String },

    /// Transport failure, passed through as received.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The payload of a successful envelope could not be decoded.
    #[error("unexpected response payload: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Business { .. } => ErrorKind::Business,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Transport(err) => match err {
                TransportError::Status { .. } if err.is_conflict() => ErrorKind::Conflict,
                TransportError::Status { .. } => ErrorKind::ClientRequest,
                TransportError::NoResponse { .. } => ErrorKind::Network,
                TransportError::NeverSent { .. } => ErrorKind::Construction,
            },
        }
    }

    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ApiError::Transport(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.transport().is_some_and(TransportError::is_conflict)
    }

    /// Conflict details from a 409 body. `None` for any other error, or when
    /// the 409 body lacks the version fields.
    pub fn conflict(&self) -> Option<VersionConflict> {
        match self.transport()? {
            TransportError::Status { status, body: Some(body) } if *status == STATUS_CONFLICT => {
                serde_json::from_value(body.clone()).ok()
            }
            _ => None,
        }
    }
}
