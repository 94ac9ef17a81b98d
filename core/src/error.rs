//! Error classification for a resource load.
//!
//! # Design
//! `ApiError` is a closed set: three application-level failures derived from
//! the envelope `code`, one decode failure, and one transport failure that
//! carries the underlying cause. Callers match exhaustively to pick a
//! user-facing message; nothing here is retried or recovered.

use std::fmt;

/// Failures reported through `Outcome::Failure`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The envelope carried a code other than 0, -2 or -3 (or none at all).
    UnknownServerError,

    /// The envelope carried code -2.
    SessionExpired,

    /// The envelope carried code -3.
    NoAccess,

    /// The response body bytes were not valid JSON.
    ParseFailure(String),

    /// The request never produced a usable 2xx response.
    TransportError(TransportError),
}

/// The cause behind `ApiError::TransportError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request could not be built or sent as described (empty or
    /// malformed URL, invalid header name or value).
    InvalidRequest(String),

    /// Connection, TLS, timeout or I/O failure below HTTP.
    Io(String),

    /// The server answered with a status outside [200, 300).
    Status { status: u16 },

    /// A 2xx response arrived from a transport that supplied no body at all.
    ///
    /// An empty body is still a body and fails decoding as `ParseFailure`.
    MissingBody { status: u16 },
}

impl TransportError {
    /// HTTP status attached to this failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status } | TransportError::MissingBody { status } => {
                Some(*status)
            }
            TransportError::InvalidRequest(_) | TransportError::Io(_) => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::UnknownServerError => write!(f, "unknown server error"),
            ApiError::SessionExpired => write!(f, "session expired"),
            ApiError::NoAccess => write!(f, "no access"),
            ApiError::ParseFailure(msg) => write!(f, "response parse failed: {msg}"),
            ApiError::TransportError(err) => write!(f, "transport error: {err}"),
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::InvalidRequest(msg) => write!(f, "invalid request: {msg}"),
            TransportError::Io(msg) => write!(f, "{msg}"),
            TransportError::Status { status } => write!(f, "HTTP {status}"),
            TransportError::MissingBody { status } => {
                write!(f, "HTTP {status} with no response body")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::TransportError(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for TransportError {}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        ApiError::TransportError(err)
    }
}
