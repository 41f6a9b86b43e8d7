//! # Stock Ledger Service
//!
//! Raw-material catalog and the only path that changes a raw material's
//! quantity.
//!
//! ## Adjustment Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  adjust(id, { delta, direction, reason }, user)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  load active raw material ──────────────── missing ──► 404 NOT_FOUND    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ledger::plan_adjustment ── delta <= 0 ──► 400 INVALID_QUANTITY         │
//! │       │                  ── new < 0   ──► 422 INSUFFICIENT_STOCK        │
//! │       ▼                                                                 │
//! │  one transaction:                                                       │
//! │    UPDATE quantity WHERE quantity = previous ── stale ──► 409 CONFLICT  │
//! │    INSERT stock_movement                                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  { newQuantity, movement }                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use fabstock_core::ledger::{build_movement, plan_adjustment, resolve_reason};
use fabstock_core::validation::{
    optional_text, validate_limit, validate_name, validate_optional_barcode, validate_stock_quantity,
};
use fabstock_core::{
    MovementType, Quantity, RawMaterial, StockMovement, Unit, ValidationError, DEFAULT_LIST_LIMIT,
};
use fabstock_db::repository::generate_id;
use fabstock_db::Database;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Inputs & Outputs
// =============================================================================

/// Raw material creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRawMaterialInput {
    pub name: String,
    pub reference: Option<String>,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub unit: Option<Unit>,
    /// Opening stock; zero when omitted.
    #[serde(default)]
    pub quantity: Quantity,
    #[serde(default)]
    pub min_stock: Quantity,
    pub supplier_id: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

/// Stock adjustment form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentInput {
    pub delta: Quantity,
    pub direction: MovementType,
    pub reason: Option<String>,
}

/// Outcome of a successful adjustment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentResult {
    pub new_quantity: Quantity,
    pub movement: StockMovement,
}

// =============================================================================
// Service
// =============================================================================

/// Owns raw-material stock and its append-only movement log.
#[derive(Debug, Clone)]
pub struct StockLedgerService {
    db: Database,
}

impl StockLedgerService {
    pub fn new(db: Database) -> Self {
        StockLedgerService { db }
    }

    /// Creates an active raw material.
    ///
    /// ## Rules
    /// - Name and unit are required
    /// - Opening stock and minimum stock may be zero, never negative
    /// - A supplier, when given, must exist and be active; its name is
    ///   copied onto the record for display
    pub async fn create_raw_material(
        &self,
        input: CreateRawMaterialInput,
        user_id: &str,
    ) -> ApiResult<RawMaterial> {
        let name = validate_name(&input.name)?;
        let unit = input.unit.ok_or_else(|| ValidationError::Required {
            field: "unit".to_string(),
        })?;
        validate_stock_quantity("quantity", input.quantity)?;
        validate_stock_quantity("minStock", input.min_stock)?;
        let barcode = validate_optional_barcode(input.barcode.as_deref())?;

        let supplier = match optional_text(input.supplier_id.as_deref()) {
            Some(supplier_id) => {
                let supplier = self
                    .db
                    .suppliers()
                    .get_by_id(&supplier_id)
                    .await?
                    .filter(|s| s.is_active)
                    .ok_or_else(|| ApiError::not_found("Supplier", &supplier_id))?;
                Some(supplier)
            }
            None => None,
        };

        let now = Utc::now();
        let material = RawMaterial {
            id: generate_id(),
            name,
            reference: optional_text(input.reference.as_deref()),
            barcode,
            category: optional_text(input.category.as_deref()),
            unit,
            quantity_milli: input.quantity.milli(),
            min_stock_milli: input.min_stock.milli(),
            supplier_id: supplier.as_ref().map(|s| s.id.clone()),
            supplier_name: supplier.map(|s| s.name),
            expiry_date: input.expiry_date,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: user_id.to_string(),
        };

        let material = self.db.raw_materials().insert(&material).await?;
        info!(id = %material.id, name = %material.name, user = %user_id, "Raw material created");
        Ok(material)
    }

    /// Active raw materials, by name.
    pub async fn list_raw_materials(&self) -> ApiResult<Vec<RawMaterial>> {
        Ok(self.db.raw_materials().list_active().await?)
    }

    /// A raw material by id, inactive ones included.
    pub async fn get_raw_material(&self, id: &str) -> ApiResult<RawMaterial> {
        self.db
            .raw_materials()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Raw material", id))
    }

    /// Soft delete: the row and its movements stay.
    pub async fn deactivate_raw_material(&self, id: &str, user_id: &str) -> ApiResult<()> {
        self.db.raw_materials().soft_delete(id).await?;
        info!(id = %id, user = %user_id, "Raw material deactivated");
        Ok(())
    }

    /// Adjusts the stock of an active raw material.
    ///
    /// ## Arguments
    /// * `id` - Raw material id
    /// * `input` - Delta (> 0), direction and optional reason
    /// * `user_id` - Actor recorded on the movement
    ///
    /// ## Returns
    /// The new quantity and the movement appended to the log. On any error
    /// neither the quantity nor the log has changed.
    pub async fn adjust(&self, id: &str, input: AdjustmentInput, user_id: &str) -> ApiResult<AdjustmentResult> {
        let material = self
            .db
            .raw_materials()
            .get_by_id(id)
            .await?
            .filter(|m| m.is_active)
            .ok_or_else(|| ApiError::not_found("Raw material", id))?;

        self.adjust_material(&material, input, None, user_id).await
    }

    /// Adjusts an already loaded material.
    ///
    /// `default_reason` replaces the entry/exit label when the typed reason
    /// is blank. The write still checks the stored quantity, so a material
    /// loaded earlier cannot overwrite a newer balance.
    pub(crate) async fn adjust_material(
        &self,
        material: &RawMaterial,
        input: AdjustmentInput,
        default_reason: Option<&str>,
        user_id: &str,
    ) -> ApiResult<AdjustmentResult> {
        let plan = match plan_adjustment(material, input.delta, input.direction) {
            Ok(plan) => plan,
            Err(err) => {
                warn!(id = %material.id, error = %err, "Stock adjustment rejected");
                return Err(err.into());
            }
        };

        let reason = resolve_reason(input.reason.as_deref(), input.direction, default_reason);
        let movement = build_movement(generate_id(), material, &plan, reason, user_id, Utc::now());

        self.db.raw_materials().apply_adjustment(&plan, &movement).await?;

        info!(
            id = %material.id,
            direction = %plan.direction,
            delta = %plan.delta,
            previous = %plan.previous,
            new = %plan.new,
            user = %user_id,
            "Stock adjusted"
        );

        Ok(AdjustmentResult {
            new_quantity: plan.new,
            movement,
        })
    }

    /// Movement log of one raw material, newest first.
    pub async fn movement_history(&self, product_id: &str, limit: Option<i64>) -> ApiResult<Vec<StockMovement>> {
        let limit = validate_limit(limit, DEFAULT_LIST_LIMIT)?;
        self.get_raw_material(product_id).await?;
        Ok(self.db.movements().list_for_product(product_id, limit).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
