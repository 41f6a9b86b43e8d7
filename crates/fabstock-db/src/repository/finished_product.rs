//! # Finished Product Repository
//!
//! Catalog of finished products. Plain CRUD with soft delete.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fabstock_core::FinishedProduct;

macro_rules! select_finished_products {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, reference, barcode, category, production_unit, ",
            "production_time_minutes, target_stock, current_stock, sale_price_cents, ",
            "production_instructions, is_active, created_at, updated_at, created_by ",
            "FROM finished_products ",
            $tail
        )
    };
}

/// Repository for finished product database operations.
#[derive(Debug, Clone)]
pub struct FinishedProductRepository {
    pool: SqlitePool,
}

impl FinishedProductRepository {
    /// Creates a new FinishedProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FinishedProductRepository { pool }
    }

    /// Lists active finished products ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<FinishedProduct>> {
        let products = sqlx::query_as::<_, FinishedProduct>(select_finished_products!(
            "WHERE is_active = 1 ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Gets a finished product by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<FinishedProduct>> {
        let product = sqlx::query_as::<_, FinishedProduct>(select_finished_products!("WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Finds the active finished product carrying exactly this barcode.
    pub async fn find_active_by_barcode(&self, barcode: &str) -> DbResult<Option<FinishedProduct>> {
        let product = sqlx::query_as::<_, FinishedProduct>(select_finished_products!(
            "WHERE barcode = ?1 AND is_active = 1 ORDER BY created_at LIMIT 1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Inserts a new finished product.
    pub async fn insert(&self, product: &FinishedProduct) -> DbResult<FinishedProduct> {
        debug!(id = %product.id, reference = %product.reference, "Inserting finished product");

        sqlx::query(
            r#"
            INSERT INTO finished_products (
                id, name, reference, barcode, category, production_unit,
                production_time_minutes, target_stock, current_stock, sale_price_cents,
                production_instructions, is_active, created_at, updated_at, created_by
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.reference)
        .bind(&product.barcode)
        .bind(&product.category)
        .bind(&product.production_unit)
        .bind(product.production_time_minutes)
        .bind(product.target_stock)
        .bind(product.current_stock)
        .bind(product.sale_price_cents)
        .bind(&product.production_instructions)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .bind(&product.created_by)
        .execute(&self.pool)
        .await?;

        Ok(product.clone())
    }

    /// Soft-deletes a finished product. Past orders keep their snapshot.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting finished product");

        let result = sqlx::query("UPDATE finished_products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Finished product", id));
        }

        Ok(())
    }
}
