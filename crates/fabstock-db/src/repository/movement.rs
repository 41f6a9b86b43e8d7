//! # Stock Movement Repository
//!
//! The append-only ledger log. Rows are inserted and read, never updated or
//! deleted (the schema enforces this with triggers).

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use fabstock_core::StockMovement;

macro_rules! select_movements {
    ($tail:literal) => {
        concat!(
            "SELECT id, movement_type, product_id, product_kind, product_name, ",
            "quantity_milli, previous_stock_milli, new_stock_milli, unit, reason, ",
            "user_id, created_at FROM stock_movements ",
            $tail
        )
    };
}

/// Repository for stock movement operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Appends a movement outside of any adjustment transaction.
    pub async fn insert(&self, movement: &StockMovement) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        insert_movement(&mut conn, movement).await
    }

    /// Returns the movements of one product, newest first.
    ///
    /// ## Arguments
    /// * `product_id` - Raw material or finished product id
    /// * `limit` - Maximum rows to return
    pub async fn list_for_product(&self, product_id: &str, limit: i64) -> DbResult<Vec<StockMovement>> {
        debug!(product_id = %product_id, limit = %limit, "Listing movements");

        let movements = sqlx::query_as::<_, StockMovement>(select_movements!(
            "WHERE product_id = ?1 ORDER BY created_at DESC, rowid DESC LIMIT ?2"
        ))
        .bind(product_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Counts movements recorded for a product.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements WHERE product_id = ?1")
            .bind(product_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Inserts one movement on an existing connection or transaction.
///
/// Used by the adjustment transaction in the raw material repository.
pub(crate) async fn insert_movement(conn: &mut SqliteConnection, movement: &StockMovement) -> DbResult<()> {
    debug!(
        id = %movement.id,
        product_id = %movement.product_id,
        movement_type = %movement.movement_type,
        "Appending stock movement"
    );

    sqlx::query(
        r#"
        INSERT INTO stock_movements (
            id, movement_type, product_id, product_kind, product_name,
            quantity_milli, previous_stock_milli, new_stock_milli, unit,
            reason, user_id, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
        "#,
    )
    .bind(&movement.id)
    .bind(movement.movement_type)
    .bind(&movement.product_id)
    .bind(movement.product_kind)
    .bind(&movement.product_name)
    .bind(movement.quantity_milli)
    .bind(movement.previous_stock_milli)
    .bind(movement.new_stock_milli)
    .bind(movement.unit)
    .bind(&movement.reason)
    .bind(&movement.user_id)
    .bind(movement.created_at)
    .execute(conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::setup;
    use crate::repository::generate_id;
    use chrono::{Duration, Utc};
    use fabstock_core::{MovementType, ProductKind, Unit};

    fn movement(product_id: &str, previous: i64, new: i64, minutes_ago: i64) -> StockMovement {
        StockMovement {
            id: generate_id(),
            movement_type: if new >= previous { MovementType::Entry } else { MovementType::Exit },
            product_id: product_id.to_string(),
            product_kind: ProductKind::RawMaterial,
            product_name: "Tomates".to_string(),
            quantity_milli: (new - previous).abs(),
            previous_stock_milli: previous,
            new_stock_milli: new,
            unit: Unit::Kilogram,
            reason: "Inventaire".to_string(),
            user_id: "user-1".to_string(),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
        }
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let db = setup().await;
        let repo = db.movements();

        repo.insert(&movement("mp-1", 0, 1_000, 30)).await.unwrap();
        repo.insert(&movement("mp-1", 1_000, 3_000, 20)).await.unwrap();
        repo.insert(&movement("mp-1", 3_000, 2_500, 10)).await.unwrap();
        repo.insert(&movement("mp-2", 0, 9_000, 5)).await.unwrap();

        let history = repo.list_for_product("mp-1", 2).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].new_stock_milli, 2_500);
        assert_eq!(history[0].movement_type, MovementType::Exit);
        assert_eq!(history[1].new_stock_milli, 3_000);

        assert_eq!(repo.count_for_product("mp-1").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_movements_cannot_be_rewritten() {
        let db = setup().await;
        let entry = movement("mp-1", 0, 1_000, 0);
        db.movements().insert(&entry).await.unwrap();

        let update = sqlx::query("UPDATE stock_movements SET reason = 'x' WHERE id = ?1")
            .bind(&entry.id)
            .execute(db.pool())
            .await;
        assert!(update.is_err());

        let delete = sqlx::query("DELETE FROM stock_movements WHERE id = ?1")
            .bind(&entry.id)
            .execute(db.pool())
            .await;
        assert!(delete.is_err());
    }
}
