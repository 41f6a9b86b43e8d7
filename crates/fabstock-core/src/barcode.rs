//! # Barcode Resolution
//!
//! Maps a scanned or typed code to a catalog record.
//!
//! ```text
//!   code ──trim──► active raw material with barcode = code ?  ──► RawMaterial
//!                          │ no
//!                          ▼
//!                 active finished product with barcode = code ? ──► FinishedProduct
//!                          │ no
//!                          ▼
//!                       NotFound { code }   (UI offers to create a raw material)
//! ```
//!
//! The lookups themselves live in fabstock-db; this module owns the result
//! type and the precedence rule.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::{FinishedProduct, RawMaterial};
use crate::validation::validate_barcode;

/// Outcome of resolving a code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "kind", content = "product", rename_all = "snake_case")]
pub enum ScanResult {
    RawMaterial(RawMaterial),
    FinishedProduct(FinishedProduct),
    NotFound { code: String },
}

impl ScanResult {
    /// Applies the precedence rule: raw materials win over finished products.
    pub fn from_lookups(
        code: &str,
        raw_material: Option<RawMaterial>,
        finished_product: Option<FinishedProduct>,
    ) -> Self {
        match (raw_material, finished_product) {
            (Some(material), _) => ScanResult::RawMaterial(material),
            (None, Some(product)) => ScanResult::FinishedProduct(product),
            (None, None) => ScanResult::NotFound {
                code: code.to_string(),
            },
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, ScanResult::NotFound { .. })
    }
}

/// Normalises a scanned code before lookup.
///
/// ```rust
/// use fabstock_core::barcode::normalize_code;
///
/// assert_eq!(normalize_code(" 3760001000011\n").unwrap(), "3760001000011");
/// assert!(normalize_code("   ").is_err());
/// ```
pub fn normalize_code(code: &str) -> Result<String, ValidationError> {
    validate_barcode(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Unit;
    use chrono::Utc;

    fn material() -> RawMaterial {
        let now = Utc::now();
        RawMaterial {
            id: "mp-1".to_string(),
            name: "Tomates".to_string(),
            reference: None,
            barcode: Some("111".to_string()),
            category: None,
            unit: Unit::Kilogram,
            quantity_milli: 10_000,
            min_stock_milli: 5_000,
            supplier_id: None,
            supplier_name: None,
            expiry_date: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: "u".to_string(),
        }
    }

    fn product() -> FinishedProduct {
        let now = Utc::now();
        FinishedProduct {
            id: "pf-1".to_string(),
            name: "Sauce".to_string(),
            reference: "PF-1".to_string(),
            barcode: Some("111".to_string()),
            category: None,
            production_unit: None,
            production_time_minutes: None,
            target_stock: 0,
            current_stock: 0,
            sale_price_cents: None,
            production_instructions: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: "u".to_string(),
        }
    }

    #[test]
    fn test_raw_material_takes_precedence() {
        let result = ScanResult::from_lookups("111", Some(material()), Some(product()));
        assert!(matches!(result, ScanResult::RawMaterial(_)));

        let result = ScanResult::from_lookups("111", None, Some(product()));
        assert!(matches!(result, ScanResult::FinishedProduct(_)));
    }

    #[test]
    fn test_not_found_keeps_code() {
        let result = ScanResult::from_lookups("999", None, None);
        assert!(!result.is_found());
        assert_eq!(
            result,
            ScanResult::NotFound {
                code: "999".to_string()
            }
        );
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(ScanResult::NotFound {
            code: "999".to_string(),
        })
        .unwrap();
        assert_eq!(json["kind"], "not_found");
        assert_eq!(json["product"]["code"], "999");

        let json = serde_json::to_value(ScanResult::RawMaterial(material())).unwrap();
        assert_eq!(json["kind"], "raw_material");
        assert_eq!(json["product"]["name"], "Tomates");
    }
}
