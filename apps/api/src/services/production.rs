//! # Production Service
//!
//! Manufacturing orders (OF): creation with daily numbering, then the
//! lifecycle transitions.
//!
//! ## Lifecycle
//! ```text
//!            create                launch               finish
//!   (none) ─────────► planned ─────────────► in_progress ─────────► finished
//!                        │
//!                        │ cancel
//!                        ▼
//!                    cancelled
//! ```
//!
//! Each transition is checked twice: by `fabstock_core::order` against the
//! loaded order, then by the conditional UPDATE against the stored status.

use chrono::{Local, NaiveDate, Utc};
use serde::Deserialize;
use tracing::{info, warn};

use fabstock_core::order::{self, Completion, OrderDraft};
use fabstock_core::validation::validate_limit;
use fabstock_core::{CoreResult, ManufacturingOrder, Priority, DEFAULT_LIST_LIMIT};
use fabstock_db::repository::generate_id;
use fabstock_db::Database;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Inputs
// =============================================================================

/// Order creation form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub finished_product_id: String,
    pub quantity: i64,
    pub expected_completion_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    pub instructions: Option<String>,
}

/// Completion report.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishOrderInput {
    pub quantity_produced: i64,
    /// Percentage, 0 to 100.
    pub scrap_rate: Option<f64>,
    pub observations: Option<String>,
}

// =============================================================================
// Service
// =============================================================================

#[derive(Debug, Clone)]
pub struct ProductionService {
    db: Database,
}

impl ProductionService {
    pub fn new(db: Database) -> Self {
        ProductionService { db }
    }

    /// Creates a planned order numbered `OF-<local day>-<seq>`.
    ///
    /// The finished product's name and reference are copied onto the order.
    ///
    /// ## Errors
    /// - `NOT_FOUND` for an unknown or inactive finished product
    /// - `VALIDATION_ERROR` for a non-positive quantity
    /// - `CONFLICT` when a concurrent creation took the same number
    pub async fn create_order(&self, input: CreateOrderInput, user_id: &str) -> ApiResult<ManufacturingOrder> {
        let product = self
            .db
            .finished_products()
            .get_by_id(&input.finished_product_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Finished product", &input.finished_product_id))?;

        let now = Utc::now();
        let local_now = now.with_timezone(&Local);

        let draft = OrderDraft {
            quantity: input.quantity,
            expected_completion_date: input.expected_completion_date,
            priority: input.priority,
            instructions: input.instructions,
        };
        // The number is assigned inside the insert transaction
        let order = order::new_order(generate_id(), String::new(), &product, draft, user_id, now)?;

        let order = self
            .db
            .orders()
            .insert_numbered(order, local_now.date_naive(), order::start_of_day(&local_now))
            .await?;

        info!(
            id = %order.id,
            order_number = %order.order_number,
            product = %order.finished_product_name,
            quantity = order.quantity,
            user = %user_id,
            "Manufacturing order created"
        );
        Ok(order)
    }

    /// Most recent orders first.
    pub async fn list_orders(&self, limit: Option<i64>) -> ApiResult<Vec<ManufacturingOrder>> {
        let limit = validate_limit(limit, DEFAULT_LIST_LIMIT)?;
        Ok(self.db.orders().list_recent(limit).await?)
    }

    pub async fn get_order(&self, id: &str) -> ApiResult<ManufacturingOrder> {
        self.db
            .orders()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Manufacturing order", id))
    }

    /// `planned → in_progress`, recording the launching operator.
    pub async fn launch(&self, id: &str, user_id: &str) -> ApiResult<ManufacturingOrder> {
        let now = Utc::now();
        let order = self
            .transition(id, "launch", |order| order::launch(order, user_id, now))
            .await?;

        info!(order_number = %order.order_number, operator = %user_id, "Manufacturing order launched");
        Ok(order)
    }

    /// `in_progress → finished` with the produced quantity and scrap rate.
    pub async fn finish(&self, id: &str, input: FinishOrderInput, user_id: &str) -> ApiResult<ManufacturingOrder> {
        let completion = Completion::new(
            input.quantity_produced,
            input.scrap_rate,
            input.observations.as_deref(),
        )?;

        let now = Utc::now();
        let order = self
            .transition(id, "finish", |order| order::finish(order, completion, now))
            .await?;

        info!(
            order_number = %order.order_number,
            planned = order.quantity,
            produced = ?order.quantity_produced,
            scrap_bps = ?order.scrap_rate_bps,
            user = %user_id,
            "Manufacturing order finished"
        );
        Ok(order)
    }

    /// `planned → cancelled`.
    pub async fn cancel(&self, id: &str, user_id: &str) -> ApiResult<ManufacturingOrder> {
        let now = Utc::now();
        let order = self
            .transition(id, "cancel", |order| order::cancel(order, now))
            .await?;

        info!(order_number = %order.order_number, user = %user_id, "Manufacturing order cancelled");
        Ok(order)
    }

    /// Loads, applies `apply` in memory, then persists conditionally on the
    /// status the order was loaded with.
    async fn transition<F>(&self, id: &str, action: &str, apply: F) -> ApiResult<ManufacturingOrder>
    where
        F: FnOnce(&mut ManufacturingOrder) -> CoreResult<()>,
    {
        let mut order = self.get_order(id).await?;
        let expected = order.status;

        if let Err(err) = apply(&mut order) {
            warn!(order_number = %order.order_number, action = %action, error = %err, "Order transition rejected");
            return Err(err.into());
        }

        self.db.orders().update_transition(&order, expected).await?;
        Ok(order)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
