//! # Supplier Repository
//!
//! Supplier reference data. Plain CRUD with soft delete.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use fabstock_core::Supplier;

macro_rules! select_suppliers {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, contact, email, phone, address, average_delivery_days, ",
            "is_active, created_at, updated_at, created_by FROM suppliers ",
            $tail
        )
    };
}

/// Repository for supplier database operations.
#[derive(Debug, Clone)]
pub struct SupplierRepository {
    pool: SqlitePool,
}

impl SupplierRepository {
    /// Creates a new SupplierRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SupplierRepository { pool }
    }

    /// Lists active suppliers ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Supplier>> {
        let suppliers = sqlx::query_as::<_, Supplier>(select_suppliers!(
            "WHERE is_active = 1 ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(suppliers)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Supplier>> {
        let supplier = sqlx::query_as::<_, Supplier>(select_suppliers!("WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(supplier)
    }

    /// Inserts a new supplier.
    pub async fn insert(&self, supplier: &Supplier) -> DbResult<Supplier> {
        debug!(id = %supplier.id, name = %supplier.name, "Inserting supplier");

        sqlx::query(
            r#"
            INSERT INTO suppliers (
                id, name, contact, email, phone, address, average_delivery_days,
                is_active, created_at, updated_at, created_by
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&supplier.id)
        .bind(&supplier.name)
        .bind(&supplier.contact)
        .bind(&supplier.email)
        .bind(&supplier.phone)
        .bind(&supplier.address)
        .bind(supplier.average_delivery_days)
        .bind(supplier.is_active)
        .bind(supplier.created_at)
        .bind(supplier.updated_at)
        .bind(&supplier.created_by)
        .execute(&self.pool)
        .await?;

        Ok(supplier.clone())
    }

    /// Soft-deletes a supplier.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting supplier");

        let result = sqlx::query("UPDATE suppliers SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Supplier", id));
        }

        Ok(())
    }
}
