//! # Manufacturing Order Repository
//!
//! Storage for manufacturing orders (OF): numbered insert and conditional
//! status transitions.
//!
//! ## Numbered Insert
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN IMMEDIATE                       ← takes the write lock first     │
//! │    n = SELECT COUNT(*) WHERE created_at >= local midnight               │
//! │    number = OF-<day>-<n+1>                                              │
//! │    INSERT … order_number = number      ← UNIQUE index                   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Concurrent creators queue on the lock, so each counts the orders       │
//! │  committed before it. A writer from outside this path that reuses a     │
//! │  number still fails on the UNIQUE index (DbError::UniqueViolation).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use fabstock_core::order::order_number;
use fabstock_core::{ManufacturingOrder, OrderStatus};

macro_rules! select_orders {
    ($tail:literal) => {
        concat!(
            "SELECT id, order_number, finished_product_id, finished_product_name, ",
            "finished_product_reference, quantity, quantity_produced, ",
            "expected_completion_date, priority, instructions, status, created_at, ",
            "launched_at, completed_at, cancelled_at, created_by, operator_id, ",
            "scrap_rate_bps, observations FROM manufacturing_orders ",
            $tail
        )
    };
}

/// Repository for manufacturing order database operations.
#[derive(Debug, Clone)]
pub struct ManufacturingOrderRepository {
    pool: SqlitePool,
}

impl ManufacturingOrderRepository {
    /// Creates a new ManufacturingOrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ManufacturingOrderRepository { pool }
    }

    /// Gets an order by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<ManufacturingOrder>> {
        let order = sqlx::query_as::<_, ManufacturingOrder>(select_orders!("WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(order)
    }

    /// Lists the most recent orders, newest first.
    pub async fn list_recent(&self, limit: i64) -> DbResult<Vec<ManufacturingOrder>> {
        let orders = sqlx::query_as::<_, ManufacturingOrder>(select_orders!(
            "ORDER BY created_at DESC, order_number DESC LIMIT ?1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders)
    }

    /// Counts orders created at or after `since`.
    pub async fn count_created_since(&self, since: DateTime<Utc>) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM manufacturing_orders WHERE created_at >= ?1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Numbers and inserts a planned order in one transaction.
    ///
    /// ## Arguments
    /// * `order` - Validated order; its `order_number` is overwritten
    /// * `day` - Local calendar day used in the number
    /// * `day_start` - Local midnight of `day`, as UTC
    ///
    /// ## Returns
    /// The stored order with its generated number.
    pub async fn insert_numbered(
        &self,
        mut order: ManufacturingOrder,
        day: NaiveDate,
        day_start: DateTime<Utc>,
    ) -> DbResult<ManufacturingOrder> {
        // A deferred transaction would read under a shared lock and then
        // fail to upgrade it with SQLITE_BUSY when another creator commits
        let mut tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let created_today: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM manufacturing_orders WHERE created_at >= ?1")
                .bind(day_start)
                .fetch_one(&mut *tx)
                .await?;

        order.order_number = order_number(day, created_today);
        debug!(id = %order.id, order_number = %order.order_number, "Inserting manufacturing order");

        let inserted = sqlx::query(
            r#"
            INSERT INTO manufacturing_orders (
                id, order_number, finished_product_id, finished_product_name,
                finished_product_reference, quantity, quantity_produced,
                expected_completion_date, priority, instructions, status, created_at,
                launched_at, completed_at, cancelled_at, created_by, operator_id,
                scrap_rate_bps, observations
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7,
                ?8, ?9, ?10, ?11, ?12,
                ?13, ?14, ?15, ?16, ?17,
                ?18, ?19
            )
            "#,
        )
        .bind(&order.id)
        .bind(&order.order_number)
        .bind(&order.finished_product_id)
        .bind(&order.finished_product_name)
        .bind(&order.finished_product_reference)
        .bind(order.quantity)
        .bind(order.quantity_produced)
        .bind(order.expected_completion_date)
        .bind(order.priority)
        .bind(&order.instructions)
        .bind(order.status)
        .bind(order.created_at)
        .bind(order.launched_at)
        .bind(order.completed_at)
        .bind(order.cancelled_at)
        .bind(&order.created_by)
        .bind(&order.operator_id)
        .bind(order.scrap_rate_bps)
        .bind(&order.observations)
        .execute(&mut *tx)
        .await;

        if let Err(err) = inserted {
            let err = DbError::from(err);
            if matches!(err, DbError::UniqueViolation { .. }) {
                warn!(order_number = %order.order_number, "Order number taken by a concurrent creation");
                return Err(DbError::duplicate("order_number", order.order_number));
            }
            return Err(err);
        }

        tx.commit().await?;
        Ok(order)
    }

    /// Persists a transition computed by `fabstock_core::order`.
    ///
    /// The update only applies if the stored status is still `expected`, so
    /// two operators clicking "launch" on the same order cannot both win.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - Stored status is no longer `expected`
    /// * `Err(DbError::NotFound)` - No such order
    pub async fn update_transition(&self, order: &ManufacturingOrder, expected: OrderStatus) -> DbResult<()> {
        debug!(
            id = %order.id,
            from = %expected,
            to = %order.status,
            "Persisting order transition"
        );

        let result = sqlx::query(
            r#"
            UPDATE manufacturing_orders SET
                status = ?3,
                launched_at = ?4,
                operator_id = ?5,
                completed_at = ?6,
                quantity_produced = ?7,
                scrap_rate_bps = ?8,
                observations = ?9,
                cancelled_at = ?10
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(&order.id)
        .bind(expected)
        .bind(order.status)
        .bind(order.launched_at)
        .bind(&order.operator_id)
        .bind(order.completed_at)
        .bind(order.quantity_produced)
        .bind(order.scrap_rate_bps)
        .bind(&order.observations)
        .bind(order.cancelled_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_by_id(&order.id).await? {
                Some(_) => Err(DbError::conflict("Manufacturing order", &order.id)),
                None => Err(DbError::not_found("Manufacturing order", &order.id)),
            };
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
