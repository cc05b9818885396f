//! Product entity model and DTOs.

use serde::{Deserialize, Serialize};
use sift_core::filter::{FieldMap, FieldValue, Filterable};
use sift_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// Lifecycle values stored in `products.status`.
pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_INACTIVE: &str = "INACTIVE";

/// Filterable columns of the `products` table.
pub const PRODUCT_FIELDS: FieldMap = FieldMap::new("id", "created_at", "deleted_at")
    .text("name")
    .code("code")
    .status("status")
    .parent("category_id")
    .flag("is_featured")
    .sortable(&["id", "name", "code", "created_at", "updated_at"]);

/// A product row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub category_id: Option<DbId>,
    pub name: String,
    pub code: String,
    pub status: String,
    pub is_featured: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing)]
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new product.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub category_id: Option<DbId>,
    pub name: String,
    pub code: String,
    /// Defaults to `ACTIVE` if omitted.
    pub status: Option<String>,
    /// Defaults to `false` if omitted.
    pub is_featured: Option<bool>,
}

impl Filterable for Product {
    fn field(&self, column: &str) -> FieldValue {
        match column {
            "id" => FieldValue::Id(self.id),
            "category_id" => self.category_id.map_or(FieldValue::Null, FieldValue::Id),
            "name" => FieldValue::Text(self.name.clone()),
            "code" => FieldValue::Text(self.code.clone()),
            "status" => FieldValue::Text(self.status.clone()),
            "is_featured" => FieldValue::Bool(self.is_featured),
            "created_at" => FieldValue::Timestamp(self.created_at),
            "updated_at" => FieldValue::Timestamp(self.updated_at),
            "deleted_at" => self.deleted_at.map_or(FieldValue::Null, FieldValue::Timestamp),
            _ => FieldValue::Null,
        }
    }
}
