//! # Manufacturing Order Lifecycle
//!
//! Numbering scheme and state transitions for manufacturing orders (OF).
//!
//! ## Numbering
//! ```text
//!   OF-20240315-007
//!   │  │        └── orders created since local midnight + 1, zero-padded to 3
//!   │  └─────────── local calendar day of creation
//!   └────────────── fixed prefix
//! ```
//!
//! The count is read and the order inserted in one database transaction, and
//! the `order_number` column is UNIQUE, so a concurrent creator that computed
//! the same sequence fails instead of persisting a duplicate.
//!
//! ## Transitions
//! Every function here mutates an in-memory order only after the state
//! machine in [`OrderStatus::can_transition_to`] accepts the edge. The
//! repository then persists with a conditional `WHERE status = <expected>`,
//! so a stale client cannot resurrect a terminal order.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{FinishedProduct, ManufacturingOrder, OrderStatus, Priority, ScrapRate};
use crate::validation::{optional_text, validate_order_quantity, validate_scrap_percentage};

/// Prefix of every order number.
pub const ORDER_NUMBER_PREFIX: &str = "OF";

// =============================================================================
// Numbering
// =============================================================================

/// Formats the order number for the `created_today + 1`-th order of `day`.
///
/// ```rust
/// use chrono::NaiveDate;
/// use fabstock_core::order::order_number;
///
/// let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
/// assert_eq!(order_number(day, 0), "OF-20240315-001");
/// assert_eq!(order_number(day, 41), "OF-20240315-042");
/// ```
pub fn order_number(day: NaiveDate, created_today: i64) -> String {
    format!(
        "{}-{}-{:03}",
        ORDER_NUMBER_PREFIX,
        day.format("%Y%m%d"),
        created_today + 1
    )
}

/// Returns the instant of the most recent local midnight before `now`.
///
/// Generic over the time zone so tests can pin one; the service passes
/// `Local::now()`. On a day whose midnight is skipped by a DST change the
/// first valid instant of that day is used.
pub fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let day = now.date_naive();

    // Walk forward an hour at a time in case midnight falls in a DST gap
    for hour in 0..3 {
        if let Some(naive) = day.and_hms_opt(hour, 0, 0) {
            if let Some(start) = tz.from_local_datetime(&naive).earliest() {
                return start.with_timezone(&Utc);
            }
        }
    }

    now.with_timezone(&Utc)
}

// =============================================================================
// Creation
// =============================================================================

/// Form input for a new manufacturing order.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub quantity: i64,
    pub expected_completion_date: Option<NaiveDate>,
    pub priority: Priority,
    pub instructions: Option<String>,
}

/// Builds a planned order for `product`.
///
/// ## Errors
/// - `NotFound` when the finished product is inactive
/// - `Validation` when the quantity is not a positive integer
pub fn new_order(
    id: String,
    order_number: String,
    product: &FinishedProduct,
    draft: OrderDraft,
    created_by: &str,
    now: DateTime<Utc>,
) -> CoreResult<ManufacturingOrder> {
    if !product.is_active {
        return Err(CoreError::not_found("Finished product", &product.id));
    }
    validate_order_quantity("quantity", draft.quantity)?;

    Ok(ManufacturingOrder {
        id,
        order_number,
        finished_product_id: product.id.clone(),
        finished_product_name: product.name.clone(),
        finished_product_reference: product.reference.clone(),
        quantity: draft.quantity,
        quantity_produced: None,
        expected_completion_date: draft.expected_completion_date,
        priority: draft.priority,
        instructions: optional_text(draft.instructions.as_deref()),
        status: OrderStatus::Planned,
        created_at: now,
        launched_at: None,
        completed_at: None,
        cancelled_at: None,
        created_by: created_by.to_string(),
        operator_id: None,
        scrap_rate_bps: None,
        observations: None,
    })
}

// =============================================================================
// Transitions
// =============================================================================

/// Rejects `order.status → to` unless it is an edge of the state machine.
pub fn ensure_transition(order: &ManufacturingOrder, to: OrderStatus) -> CoreResult<()> {
    if order.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition {
            order_number: order.order_number.clone(),
            from: order.status,
            to,
        })
    }
}

/// `planned → in_progress`: stamps the launch time and the operator.
pub fn launch(order: &mut ManufacturingOrder, operator_id: &str, now: DateTime<Utc>) -> CoreResult<()> {
    ensure_transition(order, OrderStatus::InProgress)?;

    order.status = OrderStatus::InProgress;
    order.launched_at = Some(now);
    order.operator_id = Some(operator_id.to_string());
    Ok(())
}

/// Completion report typed by the operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub quantity_produced: i64,
    pub scrap_rate: Option<ScrapRate>,
    pub observations: Option<String>,
}

impl Completion {
    /// Validates the completion form.
    ///
    /// `scrap_percentage` is optional and must be within 0..=100 when given.
    pub fn new(
        quantity_produced: i64,
        scrap_percentage: Option<f64>,
        observations: Option<&str>,
    ) -> CoreResult<Self> {
        validate_order_quantity("quantity_produced", quantity_produced)?;
        let scrap_rate = scrap_percentage.map(validate_scrap_percentage).transpose()?;

        Ok(Completion {
            quantity_produced,
            scrap_rate,
            observations: optional_text(observations),
        })
    }
}

/// `in_progress → finished`: records what was produced.
///
/// The finished product's `current_stock` is left untouched.
pub fn finish(order: &mut ManufacturingOrder, completion: Completion, now: DateTime<Utc>) -> CoreResult<()> {
    ensure_transition(order, OrderStatus::Finished)?;

    order.status = OrderStatus::Finished;
    order.quantity_produced = Some(completion.quantity_produced);
    order.scrap_rate_bps = completion.scrap_rate.map(|r| i64::from(r.bps()));
    order.observations = completion.observations;
    order.completed_at = Some(now);
    Ok(())
}

/// `planned → cancelled`.
pub fn cancel(order: &mut ManufacturingOrder, now: DateTime<Utc>) -> CoreResult<()> {
    ensure_transition(order, OrderStatus::Cancelled)?;

    order.status = OrderStatus::Cancelled;
    order.cancelled_at = Some(now);
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn sauce() -> FinishedProduct {
        let now = Utc::now();
        FinishedProduct {
            id: "pf-1".to_string(),
            name: "Sauce tomate".to_string(),
            reference: "PF-SAUCE-500".to_string(),
            barcode: None,
            category: None,
            production_unit: Some("bocal 500g".to_string()),
            production_time_minutes: Some(90),
            target_stock: 200,
            current_stock: 0,
            sale_price_cents: Some(450),
            production_instructions: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: "user-1".to_string(),
        }
    }

    fn draft(quantity: i64) -> OrderDraft {
        OrderDraft {
            quantity,
            expected_completion_date: None,
            priority: Priority::High,
            instructions: Some("  ".to_string()),
        }
    }

    fn planned_order() -> ManufacturingOrder {
        new_order(
            "of-1".to_string(),
            "OF-20240315-001".to_string(),
            &sauce(),
            draft(50),
            "user-1",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn test_order_number_sequence() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let numbers: Vec<String> = (0..3).map(|n| order_number(day, n)).collect();
        assert_eq!(
            numbers,
            vec!["OF-20240315-001", "OF-20240315-002", "OF-20240315-003"]
        );
        // Past 999 the sequence widens instead of wrapping
        assert_eq!(order_number(day, 999), "OF-20240315-1000");
    }

    #[test]
    fn test_start_of_day_uses_local_midnight() {
        let paris = FixedOffset::east_opt(2 * 3600).unwrap();
        // 2024-03-15 01:30 in UTC+2 is 2024-03-14 23:30 UTC
        let now = paris.with_ymd_and_hms(2024, 3, 15, 1, 30, 0).unwrap();
        let start = start_of_day(&now);
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 14, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_new_order_snapshots_product() {
        let order = planned_order();
        assert_eq!(order.status, OrderStatus::Planned);
        assert_eq!(order.finished_product_name, "Sauce tomate");
        assert_eq!(order.finished_product_reference, "PF-SAUCE-500");
        assert_eq!(order.quantity, 50);
        assert_eq!(order.priority, Priority::High);
        assert_eq!(order.instructions, None);
    }

    #[test]
    fn test_new_order_rejects_inactive_product_and_bad_quantity() {
        let mut product = sauce();
        assert!(matches!(
            new_order("x".into(), "n".into(), &product, draft(0), "u", Utc::now()),
            Err(CoreError::Validation(_))
        ));

        product.is_active = false;
        assert!(matches!(
            new_order("x".into(), "n".into(), &product, draft(10), "u", Utc::now()),
            Err(CoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_launch_then_finish() {
        let mut order = planned_order();
        launch(&mut order, "operator-7", Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::InProgress);
        assert_eq!(order.operator_id.as_deref(), Some("operator-7"));
        assert!(order.launched_at.is_some());

        let completion = Completion::new(48, Some(4.0), Some("RAS")).unwrap();
        finish(&mut order, completion, Utc::now()).unwrap();
        assert_eq!(order.status, OrderStatus::Finished);
        assert_eq!(order.quantity_produced, Some(48));
        assert_eq!(order.scrap_rate().map(|r| r.bps()), Some(400));
        assert_eq!(order.observations.as_deref(), Some("RAS"));
        assert!(order.completed_at.is_some());
    }

    #[test]
    fn test_finish_requires_in_progress() {
        let mut order = planned_order();
        let completion = Completion::new(10, None, None).unwrap();
        let err = finish(&mut order, completion, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidTransition {
                from: OrderStatus::Planned,
                to: OrderStatus::Finished,
                ..
            }
        ));
        assert_eq!(order.status, OrderStatus::Planned);
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        let mut cancelled = planned_order();
        cancel(&mut cancelled, Utc::now()).unwrap();
        assert!(cancelled.cancelled_at.is_some());
        assert!(launch(&mut cancelled, "op", Utc::now()).is_err());
        assert!(cancel(&mut cancelled, Utc::now()).is_err());

        let mut finished = planned_order();
        launch(&mut finished, "op", Utc::now()).unwrap();
        assert!(cancel(&mut finished, Utc::now()).is_err());
        finish(&mut finished, Completion::new(1, None, None).unwrap(), Utc::now()).unwrap();
        assert!(launch(&mut finished, "op", Utc::now()).is_err());
    }

    #[test]
    fn test_completion_validation() {
        assert!(Completion::new(0, None, None).is_err());
        assert!(Completion::new(5, Some(150.0), None).is_err());
        let completion = Completion::new(5, None, Some("")).unwrap();
        assert_eq!(completion.scrap_rate, None);
        assert_eq!(completion.observations, None);
    }
}
