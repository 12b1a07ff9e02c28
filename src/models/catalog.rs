//! Catalog and location lookups: service categories, subcategories,
//! provinces, and cantons. All four come from unauthenticated GET
//! endpoints and share the list-plus-result response shape.

use serde::{Deserialize, Serialize};

use super::{impl_api_reply, ErrorItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "CategoriaId", alias = "categoriaId", default)]
    pub category_id: i64,

    #[serde(rename = "Nombre", alias = "nombre", default)]
    pub name: String,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subcategory {
    #[serde(rename = "SubCategoriaId", alias = "subCategoriaId", default)]
    pub subcategory_id: i64,

    #[serde(rename = "Categoria", alias = "categoria", default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    #[serde(rename = "Nombre", alias = "nombre", default)]
    pub name: String,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Province {
    #[serde(rename = "ProvinciaId", alias = "provinciaId", default)]
    pub province_id: i64,

    #[serde(rename = "Nombre", alias = "nombre", default)]
    pub name: String,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canton {
    #[serde(rename = "CantonId", alias = "cantonId", default)]
    pub canton_id: i64,

    #[serde(rename = "Provincia", alias = "provincia", default, skip_serializing_if = "Option::is_none")]
    pub province: Option<Province>,

    #[serde(rename = "Nombre", alias = "nombre", default)]
    pub name: String,

    #[serde(rename = "CreatedAt", alias = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(rename = "UpdatedAt", alias = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Canton {
    /// Id of the owning province, 0 when the server omitted it.
    pub fn province_id(&self) -> i64 {
        self.province.as_ref().map(|p| p.province_id).unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesResponse {
    #[serde(rename = "Categorias", alias = "categorias", default)]
    pub categories: Vec<Category>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcategoriesResponse {
    #[serde(rename = "SubCategorias", alias = "subCategorias", default)]
    pub subcategories: Vec<Subcategory>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvincesResponse {
    #[serde(rename = "Provincias", alias = "provincias", default)]
    pub provinces: Vec<Province>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CantonsResponse {
    #[serde(rename = "Cantones", alias = "cantones", default)]
    pub cantons: Vec<Canton>,

    #[serde(rename = "resultado", alias = "Resultado", default)]
    pub success: bool,

    #[serde(rename = "error", alias = "Error", default)]
    pub errors: Vec<ErrorItem>,
}

impl_api_reply!(
    CategoriesResponse,
    SubcategoriesResponse,
    ProvincesResponse,
    CantonsResponse,
);
