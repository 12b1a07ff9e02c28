//! User account models: registration, login, email verification, and
//! profile lookup.

use serde::{Deserialize, Serialize};

use super::{impl_api_reply, Canton, ErrorItem, Province, SessionInfo};

/// Full user record, used both when registering and when fetching a
/// profile. The backend accepts the same shape in both directions; the
/// write-only fields (`password`, `salt`) come back empty on reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "UsuarioId", alias = "usuarioId", default)]
    pub user_id: i64,

    #[serde(rename = "Provincia", alias = "provincia", default, skip_serializing_if = "Option::is_none")]
    pub province: Option<Province>,

    #[serde(rename = "Canton", alias = "canton", default, skip_serializing_if = "Option::is_none")]
    pub canton: Option<Canton>,

    #[serde(rename = "Nombre", alias = "nombre", default)]
    pub first_name: String,

    #[serde(rename = "Apellido1", alias = "apellido1", default)]
    pub last_name: String,

    #[serde(rename = "Apellido2", alias = "apellido2", default)]
    pub second_last_name: String,

    #[serde(rename = "FechaNacimiento", alias = "fechaNacimiento", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,

    #[serde(rename = "Correo", alias = "correo", default)]
    pub email: String,

    #[serde(rename = "FotoPerfil", alias = "fotoPerfil", default)]
    pub profile_photo: String,

    #[serde(rename = "Telefono", alias = "telefono", default)]
    pub phone: String,

    #[serde(rename = "Direccion", alias = "direccion", default)]
    pub address: String,

    #[serde(rename = "Contrasena", alias = "contrasena", default)]
    pub password: String,

    #[serde(rename = "Salt", alias = "salt", default)]
    pub salt: String,

    #[serde(rename = "Verificacion", alias = "verificacion", default)]
    pub verification: i32,

    #[serde(rename = "Activo", alias = "activo", default)]
    pub active: bool,

    #[serde(rename = "PerfilCompleto", alias = "perfilCompleto", default)]
    pub profile_complete: bool,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            user_id: 0,
            province: None,
            canton: None,
            first_name: String::new(),
            last_name: String::new(),
            second_last_name: String::new(),
            birth_date: None,
            email: String::new(),
            profile_photo: String::new(),
            phone: String::new(),
            address: String::new(),
            password: String::new(),
            salt: String::new(),
            verification: 0,
            // New accounts start active with an incomplete profile
            active: true,
            profile_complete: false,
            created_at: None,
            updated_at: None,
        }
    }
}

impl User {
    /// Lookup key for the profile endpoint: id 0 means search by email.
    pub fn lookup_by_email(email: impl Into<String>) -> Self {
        Self {
            user_id: 0,
            email: email.into(),
            active: false,
            ..Default::default()
        }
    }

    /// Display name assembled from the populated name parts.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.last_name, &self.second_last_name]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// ===== Registration =====

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "Usuario")]
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterResponse {
    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

// ===== Login =====

#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    #[serde(rename = "Correo")]
    pub email: String,

    #[serde(rename = "Contrasena")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    #[serde(rename = "Usuario")]
    pub user: LoginCredentials,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "sesion", alias = "Sesion", default)]
    pub session: Option<SessionInfo>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

// ===== Email verification =====

#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest {
    #[serde(rename = "Correo")]
    pub email: String,

    #[serde(rename = "Verificacion")]
    pub code: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VerifyResponse {
    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

// ===== Profile lookup =====

#[derive(Debug, Clone, Serialize)]
pub struct UserLookupRequest {
    #[serde(rename = "Usuario")]
    pub user: User,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "Usuario", alias = "usuario", default)]
    pub user: Option<User>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

impl_api_reply!(RegisterResponse, LoginResponse, VerifyResponse, UserResponse);
