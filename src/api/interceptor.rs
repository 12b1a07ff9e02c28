//! Authenticating request interceptor.
//!
//! Every outgoing request passes through here: credentials are
//! attached from the session store before dispatch, and every response
//! is inspected afterwards so authentication failures heal themselves
//! (close the local session, tell the UI) no matter which screen
//! triggered the call. Post-processing is strictly best-effort; nothing
//! in it may fail the original caller.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{RequestBuilder, StatusCode};
use serde::Serialize;
use tracing::{debug, warn};

use crate::session::{SessionEvent, SessionStore, UiNotifier};

use super::error::TransportError;

/// Custom request header carrying the server-issued session id
const SESSION_ID_HEADER: &str = "sessionid";

/// Response header carrying a rotated bearer token
const NEW_TOKEN_HEADER: &str = "new-token";

/// Response header advertising a refresh token. No refresh flow exists;
/// its presence is only logged.
const REFRESH_TOKEN_HEADER: &str = "refresh-token";

// Static app-identification headers
const APP_VERSION_HEADER: &str = "x-app-version";
const PLATFORM_HEADER: &str = "x-platform";
const APP_VERSION: &str = "1.0";
const PLATFORM: &str = "mobile";

/// Status and full body text of a dispatched request, captured after
/// auth post-processing has run.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

/// Wraps the HTTP transport with credential attachment and
/// authentication-failure handling.
pub struct AuthInterceptor {
    http: reqwest::Client,
    session: Arc<SessionStore>,
    notifier: UiNotifier,
}

impl AuthInterceptor {
    pub fn new(http: reqwest::Client, session: Arc<SessionStore>, notifier: UiNotifier) -> Self {
        Self {
            http,
            session,
            notifier,
        }
    }

    pub async fn get(&self, url: &str) -> Result<RawResponse, TransportError> {
        self.execute(self.http.get(url)).await
    }

    pub async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<RawResponse, TransportError> {
        self.execute(self.http.post(url).json(body)).await
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<RawResponse, TransportError> {
        let response = builder.headers(self.auth_headers()).send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(status = %status, "Response received");

        self.post_process(status, &headers, &body);

        Ok(RawResponse { status, body })
    }

    /// Headers attached while a session is active. Logged-out requests
    /// go out bare.
    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if !self.session.is_logged_in() {
            return headers;
        }

        match HeaderValue::from_str(&format!("Bearer {}", self.session.token())) {
            Ok(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            Err(e) => warn!(error = %e, "Stored token is not a valid header value"),
        }
        match HeaderValue::from_str(&self.session.session_id()) {
            Ok(value) => {
                headers.insert(HeaderName::from_static(SESSION_ID_HEADER), value);
            }
            Err(e) => warn!(error = %e, "Stored session id is not a valid header value"),
        }

        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            HeaderName::from_static(APP_VERSION_HEADER),
            HeaderValue::from_static(APP_VERSION),
        );
        headers.insert(
            HeaderName::from_static(PLATFORM_HEADER),
            HeaderValue::from_static(PLATFORM),
        );
        headers
    }

    /// React to authentication-related responses. First match wins;
    /// everything in here is logged rather than propagated, and the
    /// response has already been captured for the caller.
    fn post_process(&self, status: StatusCode, headers: &HeaderMap, body: &str) {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("Server rejected credentials, closing local session");
                self.session.close();
                self.notifier.notify(SessionEvent::Expired);
            }
            StatusCode::FORBIDDEN => {
                self.notifier.notify(SessionEvent::AccessDenied);
            }
            StatusCode::BAD_REQUEST => {
                // Session problems surface as 400s with a telltale body
                if body.contains("token") || body.contains("session") {
                    warn!("Server reported an invalid session, closing local session");
                    self.session.close();
                    self.notifier.notify(SessionEvent::Invalidated);
                }
            }
            _ => self.read_token_headers(headers),
        }
    }

    fn read_token_headers(&self, headers: &HeaderMap) {
        if let Some(value) = headers.get(NEW_TOKEN_HEADER) {
            match value.to_str() {
                Ok(token) if !token.is_empty() => {
                    self.session.update_token(token);
                    debug!("Bearer token rotated from response headers");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "Unreadable New-Token header"),
            }
        }

        if headers.contains_key(REFRESH_TOKEN_HEADER) {
            debug!("Refresh token offered by server, ignoring");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionInfo;
    use crate::prefs::MemoryPreferences;

    fn logged_in_store() -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryPreferences::new())));
        store.save(
            &SessionInfo {
                session_id: "abc".into(),
                active: true,
                created_at: None,
                closed_at: None,
                token: "xyz".into(),
            },
            "a@b.com",
            None,
            None,
        );
        store
    }

    fn interceptor(
        store: Arc<SessionStore>,
    ) -> (
        AuthInterceptor,
        tokio::sync::mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let (notifier, rx) = UiNotifier::channel();
        (
            AuthInterceptor::new(reqwest::Client::new(), store, notifier),
            rx,
        )
    }

    #[test]
    fn test_auth_headers_attached_when_logged_in() {
        let (interceptor, _rx) = interceptor(logged_in_store());
        let headers = interceptor.auth_headers();

        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer xyz");
        assert_eq!(headers.get(SESSION_ID_HEADER).unwrap(), "abc");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert_eq!(headers.get(APP_VERSION_HEADER).unwrap(), APP_VERSION);
        assert_eq!(headers.get(PLATFORM_HEADER).unwrap(), PLATFORM);
    }

    #[test]
    fn test_no_headers_when_logged_out() {
        let store = Arc::new(SessionStore::new(Arc::new(MemoryPreferences::new())));
        let (interceptor, _rx) = interceptor(store);
        assert!(interceptor.auth_headers().is_empty());
    }

    #[test]
    fn test_unauthorized_closes_session_and_notifies_once() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        interceptor.post_process(StatusCode::UNAUTHORIZED, &HeaderMap::new(), "");

        assert!(!store.is_logged_in());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Expired);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_forbidden_keeps_session() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        interceptor.post_process(StatusCode::FORBIDDEN, &HeaderMap::new(), "");

        assert!(store.is_logged_in());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::AccessDenied);
    }

    #[test]
    fn test_bad_request_with_token_text_invalidates_session() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        interceptor.post_process(StatusCode::BAD_REQUEST, &HeaderMap::new(), "invalid token");

        assert!(!store.is_logged_in());
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Invalidated);
    }

    #[test]
    fn test_bad_request_without_session_text_is_ignored() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        interceptor.post_process(
            StatusCode::BAD_REQUEST,
            &HeaderMap::new(),
            "missing field Titulo",
        );

        assert!(store.is_logged_in());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_substring_match_is_case_sensitive() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        interceptor.post_process(StatusCode::BAD_REQUEST, &HeaderMap::new(), "Invalid Token");

        assert!(store.is_logged_in());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_new_token_header_rotates_token() {
        let store = logged_in_store();
        let (interceptor, _rx) = interceptor(store.clone());

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(NEW_TOKEN_HEADER),
            HeaderValue::from_static("fresh"),
        );
        interceptor.post_process(StatusCode::OK, &headers, "{}");

        assert_eq!(store.token(), "fresh");
        assert_eq!(store.session_id(), "abc");
    }

    #[test]
    fn test_empty_new_token_header_is_ignored() {
        let store = logged_in_store();
        let (interceptor, _rx) = interceptor(store.clone());

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(NEW_TOKEN_HEADER),
            HeaderValue::from_static(""),
        );
        interceptor.post_process(StatusCode::OK, &headers, "{}");

        assert_eq!(store.token(), "xyz");
    }

    #[test]
    fn test_refresh_token_header_leaves_session_alone() {
        let store = logged_in_store();
        let (interceptor, mut rx) = interceptor(store.clone());

        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(REFRESH_TOKEN_HEADER),
            HeaderValue::from_static("r-1"),
        );
        interceptor.post_process(StatusCode::OK, &headers, "{}");

        assert_eq!(store.token(), "xyz");
        assert!(rx.try_recv().is_err());
    }
}
