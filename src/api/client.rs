//! Typed API client for the ServiFlex backend.
//!
//! One method per backend operation, all funneled through the same
//! normalization: a 2xx body is decoded into the typed response (empty
//! body → -4, undecodable → -5); a non-2xx body is passed through when
//! it is a structured error payload, otherwise the HTTP status becomes
//! the error code with the raw body as message; transport failures map
//! to the reserved negative codes. Callers always get a typed response
//! back, never an `Err` and never a panic.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::models::{
    ApiReply, Canton, CantonsResponse, CategoriesResponse, CreateServiceRequest,
    CreateServiceResponse, LoginCredentials, LoginRequest, LoginResponse, ProvincesResponse,
    RegisterRequest, RegisterResponse, SubcategoriesResponse, User, UserLookupRequest,
    UserResponse, VerifyRequest, VerifyResponse,
};
use crate::session::{SessionStore, UiNotifier};

use super::error::{codes, truncate_body, TransportError};
use super::interceptor::{AuthInterceptor, RawResponse};

/// Identifies the app to the backend on every request
const USER_AGENT: &str = "ServiFlex-Mobile/1.0";

/// API client for the ServiFlex backend. Construction is the only
/// fallible operation; every request method resolves to a typed
/// response.
pub struct ApiClient {
    interceptor: AuthInterceptor,
    session: Arc<SessionStore>,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>, notifier: UiNotifier) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            interceptor: AuthInterceptor::new(http, session.clone(), notifier),
            session,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    // ===== Account =====

    /// Register a new account. `POST api/usuario/insertar`.
    pub async fn register(&self, request: RegisterRequest) -> RegisterResponse {
        self.post("api/usuario/insertar", &request).await
    }

    /// Log in and persist the returned session. `POST api/usuario/login`.
    ///
    /// The email is normalized (trimmed, lowercased) before dispatch;
    /// on success the session is saved immediately with the display
    /// name derived from the email local-part.
    pub async fn login(&self, email: &str, password: &str) -> LoginResponse {
        let email = email.trim().to_lowercase();
        let request = LoginRequest {
            user: LoginCredentials {
                email: email.clone(),
                password: password.to_string(),
            },
        };

        let response: LoginResponse = self.post("api/usuario/login", &request).await;

        if response.success {
            match response.session {
                Some(ref session) if session.is_usable() => {
                    self.session.save(session, &email, None, None);
                }
                _ => warn!("Login reported success without a usable session"),
            }
        }

        response
    }

    /// Confirm the emailed verification code. `POST api/usuario/verificar`.
    pub async fn verify(&self, email: &str, code: i32) -> VerifyResponse {
        let request = VerifyRequest {
            email: email.trim().to_lowercase(),
            code,
        };
        self.post("api/usuario/verificar", &request).await
    }

    /// Fetch the logged-in user's profile. `POST api/usuario/obtener`.
    ///
    /// Requires an active session: resolves to -10/-11 without touching
    /// the network when none is stored.
    pub async fn fetch_profile(&self) -> UserResponse {
        if !self.session.is_logged_in() {
            return UserResponse::failure(codes::NO_SESSION, "No active session. Please log in.");
        }

        let email = self.session.user_email();
        if email.is_empty() {
            return UserResponse::failure(
                codes::NO_SESSION_USER,
                "No user information found in the session.",
            );
        }

        let request = UserLookupRequest {
            user: User::lookup_by_email(email),
        };
        self.post("api/usuario/obtener", &request).await
    }

    /// Fetch any user by email or id. `POST api/usuario/obtener`.
    pub async fn fetch_user(&self, email: &str, user_id: i64) -> UserResponse {
        let request = UserLookupRequest {
            user: User {
                user_id,
                ..User::lookup_by_email(email.trim().to_lowercase())
            },
        };
        self.post("api/usuario/obtener", &request).await
    }

    // ===== Catalog =====

    pub async fn list_categories(&self) -> CategoriesResponse {
        self.get("api/categoria/listar").await
    }

    pub async fn list_subcategories(&self) -> SubcategoriesResponse {
        self.get("api/subcategoria/listar").await
    }

    pub async fn list_provinces(&self) -> ProvincesResponse {
        self.get("api/provincia/listar").await
    }

    pub async fn list_cantons(&self) -> CantonsResponse {
        self.get("api/canton/listar").await
    }

    /// Client-side filter; the canton endpoint returns the whole
    /// country in one list.
    pub fn filter_cantons_by_province(cantons: &[Canton], province_id: i64) -> Vec<Canton> {
        cantons
            .iter()
            .filter(|canton| canton.province_id() == province_id)
            .cloned()
            .collect()
    }

    // ===== Services =====

    /// Publish a service listing. `POST api/servicio/insertar`.
    ///
    /// Requires an active session; the stored session id is injected
    /// into the request before dispatch.
    pub async fn create_service(&self, mut request: CreateServiceRequest) -> CreateServiceResponse {
        if !self.session.is_logged_in() {
            return CreateServiceResponse::failure(
                codes::NO_SESSION,
                "No active session. Please log in.",
            );
        }

        request.session_id = self.session.session_id();
        self.post("api/servicio/insertar", &request).await
    }

    // ===== Dispatch and normalization =====

    async fn get<Res: ApiReply>(&self, path: &str) -> Res {
        debug!(path, "GET");
        match self.interceptor.get(&self.url(path)).await {
            Ok(raw) => Self::normalize(raw),
            Err(e) => transport_failure(e),
        }
    }

    async fn post<Req: Serialize, Res: ApiReply>(&self, path: &str, body: &Req) -> Res {
        debug!(path, "POST");
        match self.interceptor.post_json(&self.url(path), body).await {
            Ok(raw) => Self::normalize(raw),
            Err(e) => transport_failure(e),
        }
    }

    /// Uniform response contract shared by every endpoint.
    fn normalize<Res: ApiReply>(raw: RawResponse) -> Res {
        if raw.status.is_success() {
            if raw.body.trim().is_empty() {
                return Res::failure(codes::EMPTY_BODY, "Empty response from server");
            }
            match serde_json::from_str(&raw.body) {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "Undecodable success response");
                    Res::failure(
                        codes::MALFORMED_BODY,
                        format!("Failed to decode server response: {}", e),
                    )
                }
            }
        } else if raw.status == StatusCode::UNAUTHORIZED {
            // The interceptor has already closed the local session
            Res::failure(codes::SESSION_REJECTED, "Invalid session, please log in again.")
        } else {
            // A structured error payload passes through unchanged, as
            // long as it actually explains itself
            match serde_json::from_str::<Res>(&raw.body) {
                Ok(response) if !response.succeeded() && !response.errors().is_empty() => response,
                _ => Res::failure(
                    raw.status.as_u16() as i32,
                    format!(
                        "Server error ({}): {}",
                        raw.status.as_u16(),
                        truncate_body(&raw.body)
                    ),
                ),
            }
        }
    }
}

fn transport_failure<Res: ApiReply>(error: TransportError) -> Res {
    warn!(error = %error, code = error.code(), "Request failed before reaching the server");
    Res::failure(error.code(), error.to_string())
}
