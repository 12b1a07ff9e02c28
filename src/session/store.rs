//! The device's single active session, persisted to preferences.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::models::SessionInfo;
use crate::prefs::KeyValueStore;

// Preference keys. The full serialized session is kept alongside the
// individual fields as a backup blob.
const SESSION_ID_KEY: &str = "SessionId";
const TOKEN_KEY: &str = "Token";
const IS_LOGGED_IN_KEY: &str = "IsLoggedIn";
const USER_EMAIL_KEY: &str = "UserEmail";
const USER_NAME_KEY: &str = "UserName";
const USER_ID_KEY: &str = "UserId";
const SESSION_DATA_KEY: &str = "SessionData";
const SESSION_CREATED_AT_KEY: &str = "SessionCreatedAt";

/// Single source of truth for "is there a usable session, and what is
/// it". Exactly one session exists per device; a new login overwrites
/// the previous one.
///
/// Mutated by three callers only: login success, explicit logout, and
/// the request interceptor's failure handling. Concurrent saves and
/// closes are not ordered beyond the per-key atomicity of the backing
/// store; callers avoid racing them.
pub struct SessionStore {
    prefs: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(prefs: Arc<dyn KeyValueStore>) -> Self {
        Self { prefs }
    }

    /// Persist a freshly issued session.
    ///
    /// When `name` is absent the display name falls back to the email
    /// local-part. Never fails the caller; persistence problems are
    /// logged by the preferences layer.
    pub fn save(&self, session: &SessionInfo, email: &str, name: Option<&str>, user_id: Option<i64>) {
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => email.split('@').next().unwrap_or_default().to_string(),
        };

        self.prefs.set_string(SESSION_ID_KEY, &session.session_id);
        self.prefs.set_string(TOKEN_KEY, &session.token);
        self.prefs.set_bool(IS_LOGGED_IN_KEY, true);
        self.prefs.set_string(USER_EMAIL_KEY, email);
        self.prefs.set_string(USER_NAME_KEY, &name);
        self.prefs.set_i64(USER_ID_KEY, user_id.unwrap_or(0));

        if let Some(created_at) = session.created_at_utc() {
            self.prefs.set_i64(SESSION_CREATED_AT_KEY, created_at.timestamp());
        }

        match serde_json::to_string(session) {
            Ok(blob) => self.prefs.set_string(SESSION_DATA_KEY, &blob),
            Err(e) => warn!(error = %e, "Failed to serialize session backup"),
        }

        debug!(email, session_id = %session.session_id, "Session saved");
    }

    /// Remove every persisted session key. Idempotent.
    pub fn close(&self) {
        self.prefs.remove(SESSION_ID_KEY);
        self.prefs.remove(TOKEN_KEY);
        self.prefs.remove(IS_LOGGED_IN_KEY);
        self.prefs.remove(USER_EMAIL_KEY);
        self.prefs.remove(USER_NAME_KEY);
        self.prefs.remove(USER_ID_KEY);
        self.prefs.remove(SESSION_DATA_KEY);
        self.prefs.remove(SESSION_CREATED_AT_KEY);
        debug!("Session closed");
    }

    /// True iff the logged-in flag is set and both credential halves
    /// are present. Cheap and side-effect-free; consulted before every
    /// authenticated request.
    pub fn is_logged_in(&self) -> bool {
        self.prefs.get_bool(IS_LOGGED_IN_KEY, false)
            && !self.token().is_empty()
            && !self.session_id().is_empty()
    }

    /// Defined purely as "not logged in". The backend never expires
    /// tokens, so there is deliberately no clock-based check here.
    pub fn is_expired(&self) -> bool {
        !self.is_logged_in()
    }

    pub fn token(&self) -> String {
        self.prefs.get_string(TOKEN_KEY, "")
    }

    pub fn session_id(&self) -> String {
        self.prefs.get_string(SESSION_ID_KEY, "")
    }

    pub fn user_email(&self) -> String {
        self.prefs.get_string(USER_EMAIL_KEY, "")
    }

    pub fn user_name(&self) -> String {
        self.prefs.get_string(USER_NAME_KEY, "")
    }

    /// Numeric user id, 0 when unknown.
    pub fn user_id(&self) -> i64 {
        self.prefs.get_i64(USER_ID_KEY, 0)
    }

    /// When the server created the session, if it told us.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        match self.prefs.get_i64(SESSION_CREATED_AT_KEY, 0) {
            0 => None,
            ts => DateTime::from_timestamp(ts, 0),
        }
    }

    /// Overwrite only the bearer token, e.g. when the server rotates it
    /// via a response header. Other session fields are untouched.
    pub fn update_token(&self, new_token: &str) {
        self.prefs.set_string(TOKEN_KEY, new_token);
        debug!("Bearer token updated");
    }

    /// Partial identity update: only non-empty names and positive ids
    /// are written.
    pub fn update_user_info(&self, name: Option<&str>, user_id: Option<i64>) {
        if let Some(name) = name {
            if !name.is_empty() {
                self.prefs.set_string(USER_NAME_KEY, name);
            }
        }
        if let Some(user_id) = user_id {
            if user_id > 0 {
                self.prefs.set_i64(USER_ID_KEY, user_id);
            }
        }
    }

    /// Deserialize the backup blob. Absent or corrupt blobs yield
    /// `None`, not an error.
    pub fn full_session(&self) -> Option<SessionInfo> {
        let blob = self.prefs.get_string(SESSION_DATA_KEY, "");
        if blob.is_empty() {
            return None;
        }
        match serde_json::from_str(&blob) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!(error = %e, "Corrupt session backup");
                None
            }
        }
    }

    /// Best-effort read of one claim from the bearer token's JWT
    /// payload. Decoded for display only, never validated; the `exp`
    /// claim in particular is ignored throughout the app.
    pub fn token_claim(&self, claim: &str) -> Option<String> {
        decode_jwt_claim(&self.token(), claim)
    }

    /// Debug dump of the current session fields.
    pub fn log_state(&self) {
        debug!(
            logged_in = self.is_logged_in(),
            email = %self.user_email(),
            name = %self.user_name(),
            session_id = %self.session_id(),
            user_id = self.user_id(),
            "Session state"
        );
    }
}

fn decode_jwt_claim(token: &str, claim: &str) -> Option<String> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let value: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    match value.get(claim)? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::MemoryPreferences;
    use base64::Engine as _;

    fn store() -> SessionStore {
        SessionStore::new(Arc::new(MemoryPreferences::new()))
    }

    fn usable_session() -> SessionInfo {
        SessionInfo {
            session_id: "abc".into(),
            active: true,
            created_at: Some("2025-06-01T10:00:00".into()),
            closed_at: None,
            token: "xyz".into(),
        }
    }

    #[test]
    fn test_save_then_logged_in() {
        let store = store();
        assert!(!store.is_logged_in());

        store.save(&usable_session(), "a@b.com", None, None);
        assert!(store.is_logged_in());
        assert!(!store.is_expired());
        assert_eq!(store.token(), "xyz");
        assert_eq!(store.session_id(), "abc");
        assert_eq!(store.user_email(), "a@b.com");
    }

    #[test]
    fn test_save_without_token_is_not_logged_in() {
        let store = store();
        let mut session = usable_session();
        session.token = String::new();
        store.save(&session, "a@b.com", None, None);
        assert!(!store.is_logged_in());

        let mut session = usable_session();
        session.session_id = String::new();
        store.save(&session, "a@b.com", None, None);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_name_derived_from_email_local_part() {
        let store = store();
        store.save(&usable_session(), "a@b.com", None, None);
        assert_eq!(store.user_name(), "a");
    }

    #[test]
    fn test_explicit_name_wins_over_derivation() {
        let store = store();
        store.save(&usable_session(), "a@b.com", Some("Ana"), Some(7));
        assert_eq!(store.user_name(), "Ana");
        assert_eq!(store.user_id(), 7);
    }

    #[test]
    fn test_close_is_idempotent() {
        let store = store();
        store.save(&usable_session(), "a@b.com", None, None);

        store.close();
        assert!(!store.is_logged_in());
        assert_eq!(store.token(), "");
        assert_eq!(store.user_email(), "");
        assert!(store.full_session().is_none());

        // Closing an already-closed session is a no-op
        store.close();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn test_update_token_leaves_other_fields() {
        let store = store();
        store.save(&usable_session(), "a@b.com", None, None);

        store.update_token("rotated");
        assert_eq!(store.token(), "rotated");
        assert_eq!(store.session_id(), "abc");
        assert_eq!(store.user_email(), "a@b.com");
        assert!(store.is_logged_in());
    }

    #[test]
    fn test_update_user_info_is_partial() {
        let store = store();
        store.save(&usable_session(), "a@b.com", Some("Ana"), Some(7));

        store.update_user_info(Some(""), Some(0));
        assert_eq!(store.user_name(), "Ana");
        assert_eq!(store.user_id(), 7);

        store.update_user_info(Some("Ana Mora"), None);
        assert_eq!(store.user_name(), "Ana Mora");
        assert_eq!(store.user_id(), 7);

        store.update_user_info(None, Some(9));
        assert_eq!(store.user_id(), 9);
    }

    #[test]
    fn test_full_session_round_trip() {
        let store = store();
        let session = usable_session();
        store.save(&session, "a@b.com", None, None);

        let restored = store.full_session().unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_full_session_corrupt_blob_is_none() {
        let prefs = Arc::new(MemoryPreferences::new());
        let store = SessionStore::new(prefs.clone());
        store.save(&usable_session(), "a@b.com", None, None);

        prefs.set_string("SessionData", "{not json");
        assert!(store.full_session().is_none());
    }

    #[test]
    fn test_created_at_persisted() {
        let store = store();
        store.save(&usable_session(), "a@b.com", None, None);
        let created_at = store.created_at().unwrap();
        assert_eq!(created_at, usable_session().created_at_utc().unwrap());
    }

    #[test]
    fn test_token_claim_extraction() {
        let store = store();
        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"a@b.com","userId":7}"#);
        let mut session = usable_session();
        session.token = format!("eyJhbGciOiJIUzI1NiJ9.{}.sig", payload);
        store.save(&session, "a@b.com", None, None);

        assert_eq!(store.token_claim("sub").as_deref(), Some("a@b.com"));
        assert_eq!(store.token_claim("userId").as_deref(), Some("7"));
        assert!(store.token_claim("missing").is_none());
    }

    #[test]
    fn test_token_claim_on_garbage_token() {
        let store = store();
        let mut session = usable_session();
        session.token = "not-a-jwt".into();
        store.save(&session, "a@b.com", None, None);
        assert!(store.token_claim("sub").is_none());
    }

    #[test]
    fn test_login_scenario() {
        // The exact shape the login endpoint returns
        let json = r#"{"resultado":true,"sesion":{"SesionId":"abc","Token":"xyz","Activo":true}}"#;
        let response: crate::models::LoginResponse = serde_json::from_str(json).unwrap();
        let session = response.session.unwrap();

        let store = store();
        store.save(&session, "a@b.com", None, None);
        assert!(store.is_logged_in());
        assert_eq!(store.user_email(), "a@b.com");
        assert_eq!(store.user_name(), "a");
    }
}
