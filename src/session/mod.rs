//! Session management: the persistent session store and the event
//! channel that carries authentication failures to the UI layer.
//!
//! The store models exactly one session per device. It is created by a
//! successful login, read before every authenticated request, and
//! destroyed by logout or by the interceptor when the server rejects
//! the credentials. There is no client-side expiry: the backend this
//! app targets never expires tokens.

pub mod notify;
pub mod store;

pub use notify::{SessionEvent, UiNotifier};
pub use store::SessionStore;
