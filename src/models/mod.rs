//! Wire models for the ServiFlex backend.
//!
//! Field names follow the backend's documented casing exactly via serde
//! renames (`Usuario`, `Correo`, `SesionId`, `resultado`, ...), with
//! aliases for the camelCase variants some endpoints emit. Response
//! types all expose the same result-flag-plus-error-list surface
//! through [`ApiReply`], which is what lets the API client synthesize
//! uniform failures for transport and decoding errors.

/// Implements [`ApiReply`] for response types that carry the standard
/// `success`/`errors` pair.
macro_rules! impl_api_reply {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl crate::models::ApiReply for $ty {
                fn failure(code: i32, message: impl Into<String>) -> Self {
                    Self {
                        success: false,
                        errors: vec![crate::models::ErrorItem::new(code, message)],
                        ..Default::default()
                    }
                }

                fn succeeded(&self) -> bool {
                    self.success
                }

                fn errors(&self) -> &[crate::models::ErrorItem] {
                    &self.errors
                }
            }
        )+
    };
}

pub(crate) use impl_api_reply;

pub mod catalog;
pub mod common;
pub mod service;
pub mod session;
pub mod user;

pub use catalog::{
    CantonsResponse, CategoriesResponse, Canton, Category, Province, ProvincesResponse,
    SubcategoriesResponse, Subcategory,
};
pub use common::{parse_server_date, ApiReply, ErrorItem};
pub use service::{CreateServiceRequest, CreateServiceResponse, Service};
pub use session::SessionInfo;
pub use user::{
    LoginCredentials, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, User,
    UserLookupRequest, UserResponse, VerifyRequest, VerifyResponse,
};
