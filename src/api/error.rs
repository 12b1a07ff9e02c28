//! Transport error classification and the reserved client-side error
//! codes carried in synthesized failure responses.

use thiserror::Error;

use crate::models::ErrorItem;

/// Reserved negative codes for client-synthesized failures, disjoint
/// from server-assigned codes (non-negative) and raw HTTP statuses.
pub mod codes {
    /// Connection could not be established (DNS, refused, TLS).
    pub const CONNECTION: i32 = -1;
    /// Request exceeded the configured timeout budget.
    pub const TIMEOUT: i32 = -2;
    /// Any other transport-level failure.
    pub const UNEXPECTED: i32 = -3;
    /// 2xx response with an empty body.
    pub const EMPTY_BODY: i32 = -4;
    /// 2xx response whose body did not decode.
    pub const MALFORMED_BODY: i32 = -5;
    /// Operation requires a session and none is stored.
    pub const NO_SESSION: i32 = -10;
    /// A session exists but is missing the user identity.
    pub const NO_SESSION_USER: i32 = -11;
    /// The server rejected the stored session (HTTP 401).
    pub const SESSION_REJECTED: i32 = -12;
}

/// Failures that happen before a response arrives. These never reach
/// API callers as errors; the client maps them to failure responses
/// carrying the matching reserved code.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection error: {0}")]
    Connection(#[source] reqwest::Error),

    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    #[error("Unexpected error: {0}")]
    Unexpected(#[source] reqwest::Error),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e)
        } else if e.is_connect() {
            TransportError::Connection(e)
        } else {
            TransportError::Unexpected(e)
        }
    }
}

impl TransportError {
    pub fn code(&self) -> i32 {
        match self {
            TransportError::Connection(_) => codes::CONNECTION,
            TransportError::Timeout(_) => codes::TIMEOUT,
            TransportError::Unexpected(_) => codes::UNEXPECTED,
        }
    }

    pub fn to_error_item(&self) -> ErrorItem {
        ErrorItem::new(self.code(), self.to_string())
    }
}

/// Maximum length for raw response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Truncate a response body for inclusion in an error message, keeping
/// the cut on a character boundary.
pub(crate) fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}
