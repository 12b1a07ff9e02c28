//! REST API layer for the ServiFlex backend.
//!
//! `ApiClient` exposes one typed operation per endpoint and owns the
//! `AuthInterceptor`, which attaches JWT bearer credentials from the
//! session store to every request and reacts to authentication
//! failures in the responses. Failures of any kind (transport,
//! protocol, or application) come back as typed responses, never as
//! errors or panics.

pub mod client;
pub mod error;
pub mod interceptor;

pub use client::ApiClient;
pub use error::{codes, TransportError};
pub use interceptor::{AuthInterceptor, RawResponse};
