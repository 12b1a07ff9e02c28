//! Shared response plumbing: the error item carried by every backend
//! response and the lazy parsing for the backend's mixed date formats.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// One (code, message) failure entry. Server-assigned codes are
/// non-negative; the client synthesizes reserved negative codes for
/// transport and decoding failures (see `api::codes`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorItem {
    #[serde(rename = "ErrorCode", alias = "errorCode", default)]
    pub code: i32,
    #[serde(rename = "Message", alias = "message", default)]
    pub message: String,
}

impl ErrorItem {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Common surface of every backend response: a success flag plus an
/// error list, with a constructor for client-synthesized failures.
///
/// `success == false` means the payload is unusable even if partially
/// populated. Failures produced by `failure` always carry exactly one
/// error with a non-empty message.
pub trait ApiReply: DeserializeOwned {
    fn failure(code: i32, message: impl Into<String>) -> Self
    where
        Self: Sized;

    fn succeeded(&self) -> bool;

    fn errors(&self) -> &[ErrorItem];

    /// Message of the first error, for display.
    fn first_error_message(&self) -> Option<&str> {
        self.errors().first().map(|e| e.message.as_str())
    }
}

/// Parse a server-supplied timestamp string.
///
/// The backend is inconsistent: session endpoints return RFC 3339,
/// entity endpoints return naive `YYYY-MM-DDTHH:MM:SS[.fff]`, and a few
/// return a bare date. Naive values are taken as UTC.
pub fn parse_server_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_server_date("2025-06-01T14:30:00Z").unwrap();
        assert_eq!(parsed.hour(), 14);

        let with_offset = parse_server_date("2025-06-01T14:30:00-06:00").unwrap();
        assert_eq!(with_offset.hour(), 20);
    }

    #[test]
    fn test_parse_naive_datetime() {
        // The shape the entity endpoints actually return
        assert!(parse_server_date("2025-06-01T14:30:00").is_some());
        assert!(parse_server_date("2025-06-01T14:30:00.1234567").is_some());
        assert!(parse_server_date("2025-06-01 14:30:00").is_some());
    }

    #[test]
    fn test_parse_bare_date() {
        let parsed = parse_server_date("2025-06-01").unwrap();
        assert_eq!(parsed.hour(), 0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_server_date("").is_none());
        assert!(parse_server_date("   ").is_none());
        assert!(parse_server_date("not a date").is_none());
        assert!(parse_server_date("01/06/2025").is_none());
    }

    #[test]
    fn test_error_item_wire_names() {
        let item: ErrorItem =
            serde_json::from_str(r#"{"ErrorCode": 1002, "Message": "Correo ya registrado"}"#)
                .unwrap();
        assert_eq!(item.code, 1002);
        assert_eq!(item.message, "Correo ya registrado");

        // Some endpoints emit camelCase
        let camel: ErrorItem =
            serde_json::from_str(r#"{"errorCode": -1, "message": "x"}"#).unwrap();
        assert_eq!(camel.code, -1);
    }
}
