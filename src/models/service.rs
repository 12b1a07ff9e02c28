//! Service-listing models for the publish flow.

use serde::{Deserialize, Serialize};

use super::{impl_api_reply, Category, ErrorItem, Subcategory, User};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Service {
    #[serde(rename = "ServicioId", alias = "servicioId", default)]
    pub service_id: i64,

    #[serde(rename = "Usuario", alias = "usuario", default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,

    #[serde(rename = "Categoria", alias = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(rename = "Titulo", alias = "titulo", default)]
    pub title: String,

    #[serde(rename = "Descripcion", alias = "descripcion", default)]
    pub description: String,

    #[serde(rename = "Precio", alias = "precio", default)]
    pub price: f64,

    #[serde(rename = "Disponibilidad", alias = "disponibilidad", default)]
    pub availability: String,

    #[serde(rename = "SubCategorias", alias = "subCategorias", default)]
    pub subcategories: Vec<Subcategory>,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Publish request. `session_id` is overwritten with the stored session
/// id by the client before dispatch; callers do not need to set it.
#[derive(Debug, Clone, Serialize)]
pub struct CreateServiceRequest {
    #[serde(rename = "SesionId")]
    pub session_id: String,

    #[serde(rename = "Servicio")]
    pub service: Service,
}

impl CreateServiceRequest {
    pub fn new(service: Service) -> Self {
        Self {
            session_id: String::new(),
            service,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateServiceResponse {
    #[serde(rename = "ServicioId", alias = "servicioId", default)]
    pub service_id: i64,

    #[serde(rename = "Mensaje", alias = "mensaje", default)]
    pub message: String,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

impl_api_reply!(CreateServiceResponse);
