//! Session wire model returned by the login endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_server_date;

/// Server-issued session: identity plus bearer credential.
///
/// The timestamp fields stay as strings on the wire (the backend's
/// formats vary) and are parsed on demand. Tokens carry an `exp` claim
/// but the backend never enforces it, so no expiry is tracked here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(rename = "SesionId", alias = "sesionId", default)]
    pub session_id: String,

    #[serde(rename = "Activo", alias = "activo", default)]
    pub active: bool,

    #[serde(rename = "FechaCreacion", alias = "fechaCreacion", default)]
    pub created_at: Option<String>,

    #[serde(rename = "FechaCierre", alias = "fechaCierre", default)]
    pub closed_at: Option<String>,

    #[serde(rename = "Token", alias = "token", default)]
    pub token: String,
}

impl SessionInfo {
    /// Parsed creation timestamp, if the server sent a readable one.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_server_date)
    }

    /// Parsed close timestamp, if the server sent a readable one.
    pub fn closed_at_utc(&self) -> Option<DateTime<Utc>> {
        self.closed_at.as_deref().and_then(parse_server_date)
    }

    /// A session is usable when it is active and carries both halves of
    /// the credential pair.
    pub fn is_usable(&self) -> bool {
        self.active && !self.token.is_empty() && !self.session_id.is_empty()
    }
}
