//! # Stock Ledger
//!
//! Pure arithmetic and record building for raw-material stock adjustments.
//!
//! ## Adjustment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust(product, delta, direction, reason, actor)                      │
//! │                                                                         │
//! │  1. delta <= 0 ?                    → InvalidQuantity   (no write)      │
//! │  2. new = entry ? cur + delta : cur - delta                             │
//! │  3. new < 0 ?                       → InsufficientStock (no write)      │
//! │  4. AdjustmentPlan { previous: cur, new }                               │
//! │           │                                                             │
//! │           ▼  (fabstock-db, one transaction)                             │
//! │  5. UPDATE quantity = new WHERE quantity = previous                     │
//! │  6. INSERT StockMovement { previous, new, ... }                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Steps 1-4 live here and never touch storage. The database layer only
//! receives a plan that already keeps the stock non-negative.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::quantity::Quantity;
use crate::types::{MovementType, ProductKind, RawMaterial, StockMovement, Unit};

/// Reason recorded for a manual entry without a typed reason.
pub const DEFAULT_ENTRY_REASON: &str = "Entrée de stock";

/// Reason recorded for a manual exit without a typed reason.
pub const DEFAULT_EXIT_REASON: &str = "Sortie de stock";

/// Reason recorded for an adjustment made from the scan screen.
pub const SCAN_ADJUSTMENT_REASON: &str = "Ajustement scan";

// =============================================================================
// Arithmetic
// =============================================================================

/// Applies `delta` to `current` in the given direction.
///
/// ## Errors
/// - `InvalidQuantity` when `delta` is zero or negative
/// - `InsufficientStock` when the result would be negative
///
/// ```rust
/// use fabstock_core::ledger::apply_delta;
/// use fabstock_core::quantity::Quantity;
/// use fabstock_core::types::{MovementType, Unit};
///
/// let ten = Quantity::from_units(10);
/// let five = Quantity::from_units(5);
/// assert_eq!(apply_delta("Tomates", Unit::Kilogram, ten, five, MovementType::Entry).unwrap(), Quantity::from_units(15));
/// assert!(apply_delta("Tomates", Unit::Kilogram, ten, Quantity::from_units(20), MovementType::Exit).is_err());
/// ```
pub fn apply_delta(
    product: &str,
    unit: Unit,
    current: Quantity,
    delta: Quantity,
    direction: MovementType,
) -> CoreResult<Quantity> {
    if !delta.is_positive() {
        return Err(CoreError::InvalidQuantity {
            reason: format!("adjustment must be positive, got {}", delta),
        });
    }

    let new = match direction {
        MovementType::Entry => current.checked_add(delta),
        MovementType::Exit => current.checked_sub(delta),
    }
    .ok_or_else(|| CoreError::InvalidQuantity {
        reason: "adjustment is out of range".to_string(),
    })?;

    if new.is_negative() {
        return Err(CoreError::InsufficientStock {
            product: product.to_string(),
            available: current.to_string(),
            requested: delta.to_string(),
            unit,
        });
    }

    Ok(new)
}

// =============================================================================
// Adjustment Plan
// =============================================================================

/// A validated adjustment ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentPlan {
    pub direction: MovementType,
    pub delta: Quantity,
    /// Stock read before the adjustment; the write is conditional on it.
    pub previous: Quantity,
    pub new: Quantity,
}

/// Plans an adjustment against the material's current stock.
pub fn plan_adjustment(
    material: &RawMaterial,
    delta: Quantity,
    direction: MovementType,
) -> CoreResult<AdjustmentPlan> {
    let previous = material.quantity();
    let new = apply_delta(&material.name, material.unit, previous, delta, direction)?;

    Ok(AdjustmentPlan {
        direction,
        delta,
        previous,
        new,
    })
}

/// Falls back to a default label when the typed reason is blank.
pub fn resolve_reason(reason: Option<&str>, direction: MovementType, default: Option<&str>) -> String {
    match reason.map(str::trim).filter(|r| !r.is_empty()) {
        Some(reason) => reason.to_string(),
        None => default
            .unwrap_or(match direction {
                MovementType::Entry => DEFAULT_ENTRY_REASON,
                MovementType::Exit => DEFAULT_EXIT_REASON,
            })
            .to_string(),
    }
}

/// Builds the ledger entry for a plan. The caller supplies id and time.
pub fn build_movement(
    id: String,
    material: &RawMaterial,
    plan: &AdjustmentPlan,
    reason: String,
    user_id: &str,
    now: DateTime<Utc>,
) -> StockMovement {
    StockMovement {
        id,
        movement_type: plan.direction,
        product_id: material.id.clone(),
        product_kind: ProductKind::RawMaterial,
        product_name: material.name.clone(),
        quantity_milli: plan.delta.milli(),
        previous_stock_milli: plan.previous.milli(),
        new_stock_milli: plan.new.milli(),
        unit: material.unit,
        reason,
        user_id: user_id.to_string(),
        created_at: now,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
