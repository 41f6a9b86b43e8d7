//! # Raw Material Repository
//!
//! Database operations for raw materials, including the ledger write.
//!
//! ## Ledger Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_adjustment(plan, movement)                                       │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    UPDATE raw_materials                                                 │
//! │       SET quantity_milli = plan.new                                     │
//! │     WHERE id = ? AND quantity_milli = plan.previous AND is_active = 1   │
//! │         │                                                               │
//! │         ├── 0 rows, row exists  → ROLLBACK, DbError::Conflict           │
//! │         ├── 0 rows, no row      → ROLLBACK, DbError::NotFound           │
//! │         ▼                                                               │
//! │    INSERT INTO stock_movements (previous, new, …)                       │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The balance and its log entry land together or not at all, and a second
//! adjustment computed from a stale read is refused instead of overwriting
//! the first one.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::movement::insert_movement;
use fabstock_core::ledger::AdjustmentPlan;
use fabstock_core::{RawMaterial, StockMovement};

macro_rules! select_raw_materials {
    ($tail:literal) => {
        concat!(
            "SELECT id, name, reference, barcode, category, unit, quantity_milli, ",
            "min_stock_milli, supplier_id, supplier_name, expiry_date, is_active, ",
            "created_at, updated_at, created_by FROM raw_materials ",
            $tail
        )
    };
}

/// Repository for raw material database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.raw_materials();
/// let materials = repo.list_active().await?;
/// let scanned = repo.find_active_by_barcode("3760001000011").await?;
/// ```
#[derive(Debug, Clone)]
pub struct RawMaterialRepository {
    pool: SqlitePool,
}

impl RawMaterialRepository {
    /// Creates a new RawMaterialRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RawMaterialRepository { pool }
    }

    /// Lists active raw materials ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<RawMaterial>> {
        let materials = sqlx::query_as::<_, RawMaterial>(select_raw_materials!(
            "WHERE is_active = 1 ORDER BY name COLLATE NOCASE"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(materials)
    }

    /// Gets a raw material by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<RawMaterial>> {
        let material = sqlx::query_as::<_, RawMaterial>(select_raw_materials!("WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(material)
    }

    /// Finds the active raw material carrying exactly this barcode.
    ///
    /// When several share a code the oldest wins, so the result is stable.
    pub async fn find_active_by_barcode(&self, barcode: &str) -> DbResult<Option<RawMaterial>> {
        debug!(barcode = %barcode, "Looking up raw material by barcode");

        let material = sqlx::query_as::<_, RawMaterial>(select_raw_materials!(
            "WHERE barcode = ?1 AND is_active = 1 ORDER BY created_at LIMIT 1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(material)
    }

    /// Inserts a new raw material.
    ///
    /// ## Arguments
    /// * `material` - Raw material to insert (id generated beforehand)
    pub async fn insert(&self, material: &RawMaterial) -> DbResult<RawMaterial> {
        debug!(id = %material.id, name = %material.name, "Inserting raw material");

        sqlx::query(
            r#"
            INSERT INTO raw_materials (
                id, name, reference, barcode, category, unit,
                quantity_milli, min_stock_milli, supplier_id, supplier_name,
                expiry_date, is_active, created_at, updated_at, created_by
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14, ?15
            )
            "#,
        )
        .bind(&material.id)
        .bind(&material.name)
        .bind(&material.reference)
        .bind(&material.barcode)
        .bind(&material.category)
        .bind(material.unit)
        .bind(material.quantity_milli)
        .bind(material.min_stock_milli)
        .bind(&material.supplier_id)
        .bind(&material.supplier_name)
        .bind(material.expiry_date)
        .bind(material.is_active)
        .bind(material.created_at)
        .bind(material.updated_at)
        .bind(&material.created_by)
        .execute(&self.pool)
        .await?;

        Ok(material.clone())
    }

    /// Applies a planned adjustment and appends its movement atomically.
    ///
    /// ## Returns
    /// * `Ok(())` - Balance updated and movement logged
    /// * `Err(DbError::Conflict)` - Stock changed since `plan.previous` was read
    /// * `Err(DbError::NotFound)` - Material missing or deactivated
    pub async fn apply_adjustment(&self, plan: &AdjustmentPlan, movement: &StockMovement) -> DbResult<()> {
        let id = movement.product_id.as_str();
        debug!(
            id = %id,
            previous = plan.previous.milli(),
            new = plan.new.milli(),
            "Applying stock adjustment"
        );

        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let result = sqlx::query(
            r#"
            UPDATE raw_materials
            SET quantity_milli = ?2, updated_at = ?3
            WHERE id = ?1 AND quantity_milli = ?4 AND is_active = 1
            "#,
        )
        .bind(id)
        .bind(plan.new.milli())
        .bind(Utc::now())
        .bind(plan.previous.milli())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            let active: Option<bool> = sqlx::query_scalar("SELECT is_active FROM raw_materials WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            tx.rollback().await?;

            return Err(match active {
                Some(true) => {
                    warn!(id = %id, "Stale stock adjustment rejected");
                    DbError::conflict("Raw material", id)
                }
                _ => DbError::not_found("Raw material", id),
            });
        }

        insert_movement(&mut tx, movement).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Soft-deletes a raw material by setting is_active = false.
    ///
    /// Movements keep pointing at the row, so history survives.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting raw material");

        let result = sqlx::query("UPDATE raw_materials SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Raw material", id));
        }

        Ok(())
    }

    /// Counts active raw materials.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM raw_materials WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
