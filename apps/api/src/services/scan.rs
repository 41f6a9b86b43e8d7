//! # Scan Service
//!
//! Resolves a scanned or typed code and routes the operator to the next
//! step.
//!
//! ## Resolution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  code (trimmed, non-empty)                                              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  active raw material with barcode == code ?                             │
//! │       │ yes ──► RawMaterial ──► adjust_scanned ──► StockLedgerService   │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  active finished product with barcode == code ?                         │
//! │       │ yes ──► FinishedProduct (summary only, no adjustment)           │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  NotFound ──► create_from_scan (raw material pre-filled with code)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, info, warn};

use fabstock_core::barcode::normalize_code;
use fabstock_core::ledger::SCAN_ADJUSTMENT_REASON;
use fabstock_core::validation::validate_reference;
use fabstock_core::{Quantity, RawMaterial, ScanResult, Unit};
use fabstock_db::Database;

use crate::error::{ApiError, ApiResult};
use crate::services::stock_ledger::{
    AdjustmentInput, AdjustmentResult, CreateRawMaterialInput, StockLedgerService,
};

/// Creation form shown after an unknown code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanCreateInput {
    pub name: String,
    pub unit: Option<Unit>,
    pub reference: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<String>,
    pub expiry_date: Option<NaiveDate>,
}

#[derive(Debug, Clone)]
pub struct ScanService {
    db: Database,
    stock: StockLedgerService,
}

impl ScanService {
    pub fn new(db: Database, stock: StockLedgerService) -> Self {
        ScanService { db, stock }
    }

    /// Raw materials take precedence over finished products.
    pub async fn resolve(&self, code: &str) -> ApiResult<ScanResult> {
        let code = normalize_code(code)?;

        let raw_material = self.db.raw_materials().find_active_by_barcode(&code).await?;
        let finished_product = match raw_material {
            Some(_) => None,
            None => self.db.finished_products().find_active_by_barcode(&code).await?,
        };

        let result = ScanResult::from_lookups(&code, raw_material, finished_product);
        debug!(code = %code, found = result.is_found(), "Code resolved");
        Ok(result)
    }

    /// Creates a raw material carrying the scanned code, with zero stock and
    /// a zero minimum. The scan form asks for a reference, so it is required
    /// here even though the full creation form leaves it optional.
    pub async fn create_from_scan(
        &self,
        code: &str,
        input: ScanCreateInput,
        user_id: &str,
    ) -> ApiResult<RawMaterial> {
        let code = normalize_code(code)?;
        let reference = validate_reference(input.reference.as_deref().unwrap_or_default())?;

        let material = self
            .stock
            .create_raw_material(
                CreateRawMaterialInput {
                    name: input.name,
                    reference: Some(reference),
                    barcode: Some(code.clone()),
                    category: input.category,
                    unit: input.unit,
                    quantity: Quantity::zero(),
                    min_stock: Quantity::zero(),
                    supplier_id: input.supplier_id,
                    expiry_date: input.expiry_date,
                },
                user_id,
            )
            .await?;

        info!(code = %code, id = %material.id, "Raw material created from scan");
        Ok(material)
    }

    /// Adjusts the raw material a code resolves to.
    ///
    /// A blank reason is recorded as "Ajustement scan". Finished products
    /// have no scan adjustment path and are rejected.
    pub async fn adjust_scanned(
        &self,
        code: &str,
        input: AdjustmentInput,
        user_id: &str,
    ) -> ApiResult<AdjustmentResult> {
        match self.resolve(code).await? {
            ScanResult::RawMaterial(material) => {
                self.stock
                    .adjust_material(&material, input, Some(SCAN_ADJUSTMENT_REASON), user_id)
                    .await
            }
            ScanResult::FinishedProduct(product) => {
                warn!(code = %code, product = %product.reference, "Scan adjustment on a finished product");
                Err(ApiError::validation(format!(
                    "{} is a finished product, its stock cannot be adjusted by scan",
                    product.name
                )))
            }
            ScanResult::NotFound { code } => Err(ApiError::not_found("Barcode", &code)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::catalog::{CatalogService, CreateFinishedProductInput};
    use fabstock_core::MovementType;
    use fabstock_db::DbConfig;

    async fn setup() -> (ScanService, CatalogService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = StockLedgerService::new(db.clone());
        (ScanService::new(db.clone(), stock), CatalogService::new(db))
    }

    fn entry(units: i64) -> AdjustmentInput {
        AdjustmentInput {
            delta: Quantity::from_units(units),
            direction: MovementType::Entry,
            reason: Some("   ".to_string()),
        }
    }

    #[tokio::test]
    async fn test_unknown_code_then_create() {
        let (scan, _) = setup().await;

        let result = scan.resolve(" 3760001000011 ").await.unwrap();
        assert_eq!(
            result,
            ScanResult::NotFound {
                code: "3760001000011".to_string()
            }
        );

        let material = scan
            .create_from_scan(
                "3760001000011",
                ScanCreateInput {
                    name: "Sucre".to_string(),
                    unit: Some(Unit::Kilogram),
                    reference: Some("MP-SUC".to_string()),
                    ..Default::default()
                },
                "user-1",
            )
            .await
            .unwrap();
        assert_eq!(material.barcode.as_deref(), Some("3760001000011"));
        assert!(material.quantity().is_zero());
        assert!(material.min_stock().is_zero());

        let result = scan.resolve("3760001000011").await.unwrap();
        assert!(matches!(result, ScanResult::RawMaterial(m) if m.id == material.id));
    }

    #[tokio::test]
    async fn test_create_from_scan_requires_reference() {
        let (scan, _) = setup().await;
        let input = ScanCreateInput {
            name: "Sucre".to_string(),
            unit: Some(Unit::Kilogram),
            reference: Some("  ".to_string()),
            ..Default::default()
        };

        let err = scan.create_from_scan("3760001000011", input, "user-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("reference"));

        // Nothing was created
        let result = scan.resolve("3760001000011").await.unwrap();
        assert!(!result.is_found());
    }

    #[tokio::test]
    async fn test_empty_code_is_validation_error() {
        let (scan, _) = setup().await;
        let err = scan.resolve("   ").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_adjust_scanned_uses_scan_reason() {
        let (scan, _) = setup().await;
        scan.create_from_scan(
            "111",
            ScanCreateInput {
                name: "Farine".to_string(),
                unit: Some(Unit::Kilogram),
                reference: Some("MP-FAR".to_string()),
                ..Default::default()
            },
            "user-1",
        )
        .await
        .unwrap();

        let result = scan.adjust_scanned("111", entry(25), "user-1").await.unwrap();
        assert_eq!(result.new_quantity, Quantity::from_units(25));
        assert_eq!(result.movement.reason, "Ajustement scan");
    }

    #[tokio::test]
    async fn test_finished_product_match_cannot_be_adjusted() {
        let (scan, catalog) = setup().await;
        catalog
            .create_finished_product(
                CreateFinishedProductInput {
                    name: "Pesto".to_string(),
                    reference: "PF-9".to_string(),
                    barcode: Some("222".to_string()),
                    ..Default::default()
                },
                "user-1",
            )
            .await
            .unwrap();

        let result = scan.resolve("222").await.unwrap();
        assert!(matches!(result, ScanResult::FinishedProduct(_)));

        let err = scan.adjust_scanned("222", entry(1), "user-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_adjust_unknown_code() {
        let (scan, _) = setup().await;
        let err = scan.adjust_scanned("999", entry(1), "user-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
