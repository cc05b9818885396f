//! Repository for the `products` table.

use sift_core::config::QueryConfig;
use sift_core::filter::FilterCriteria;
use sift_core::pagination::Page;
use sift_core::query::search;
use sift_core::types::DbId;

use crate::models::product::{CreateProduct, Product, PRODUCT_FIELDS, STATUS_ACTIVE};
use crate::source::PgSource;
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, category_id, name, code, status, is_featured, \
    created_at, updated_at, deleted_at";

/// Provides CRUD and filtered listing for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a new product, returning the created row.
    pub async fn create(pool: &DbPool, input: &CreateProduct) -> Result<Product, sqlx::Error> {
        let query = format!(
            "INSERT INTO products (category_id, name, code, status, is_featured)
             VALUES ($1, $2, $3, COALESCE($4, '{STATUS_ACTIVE}'), COALESCE($5, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.status)
            .bind(input.is_featured)
            .fetch_one(pool)
            .await
    }

    /// Find a product by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a product by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted product. Returns `true` if a row was restored.
    pub async fn restore(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Filtered, paginated listing. Soft-deleted rows are always excluded.
    pub async fn search(
        pool: &DbPool,
        criteria: &FilterCriteria,
        config: &QueryConfig,
    ) -> Result<Page<Product>, sqlx::Error> {
        search(&Self::source(pool), criteria, &PRODUCT_FIELDS, config).await
    }

    /// The `products` table as a filterable record source.
    pub fn source(pool: &DbPool) -> PgSource<Product> {
        PgSource::new(pool.clone(), "products", COLUMNS)
    }
}
