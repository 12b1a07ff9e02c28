//! Client-side core for the ServiFlex services marketplace app.
//!
//! This crate provides everything the mobile screens need short of
//! rendering: durable preferences, the single-session store, the
//! authenticating request interceptor, and a typed API client that
//! normalizes every failure mode into result-style responses.
//!
//! The UI layer wires it together once at startup and keeps the
//! receiver half of the session-event channel on its main execution
//! context:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use serviflex_client::api::ApiClient;
//! use serviflex_client::config::ClientConfig;
//! use serviflex_client::prefs::FilePreferences;
//! use serviflex_client::session::{SessionStore, UiNotifier};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let prefs = Arc::new(FilePreferences::open_default()?);
//! let session = Arc::new(SessionStore::new(prefs));
//! let (notifier, mut session_events) = UiNotifier::channel();
//! let client = ApiClient::new(&ClientConfig::load()?, session.clone(), notifier)?;
//!
//! let login = client.login("a@b.com", "secret").await;
//! if login.success {
//!     assert!(session.is_logged_in());
//! }
//! // The UI drains `session_events` and shows alerts / resets
//! // navigation as each event dictates.
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod models;
pub mod prefs;
pub mod session;

pub use api::{ApiClient, AuthInterceptor};
pub use config::ClientConfig;
pub use prefs::{FilePreferences, KeyValueStore, MemoryPreferences};
pub use session::{SessionEvent, SessionStore, UiNotifier};
