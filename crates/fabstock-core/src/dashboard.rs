//! # Dashboard Aggregator
//!
//! Read-only counters derived from raw materials and today's orders.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::quantity::Quantity;
use crate::types::{RawMaterial, StockLevel, Unit};

/// A raw material at or under its minimum threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub quantity: Quantity,
    #[ts(type = "number")]
    pub min_stock: Quantity,
    pub unit: Unit,
    pub level: StockLevel,
    /// Display text for `level`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub active_raw_materials: i64,
    pub orders_today: i64,
    pub low_stock_count: i64,
    pub alerts: Vec<StockAlert>,
}

/// Builds the summary from the active raw materials and the number of orders
/// created since local midnight.
///
/// Inactive materials passed in by mistake are ignored. Alerts are ordered by
/// name so the list is stable between refreshes.
pub fn summarize(materials: &[RawMaterial], orders_today: i64) -> DashboardSummary {
    let active: Vec<&RawMaterial> = materials.iter().filter(|m| m.is_active).collect();

    let mut alerts: Vec<StockAlert> = active
        .iter()
        .filter(|m| m.is_low_stock())
        .map(|m| StockAlert {
            id: m.id.clone(),
            name: m.name.clone(),
            quantity: m.quantity(),
            min_stock: m.min_stock(),
            unit: m.unit,
            level: m.stock_level(),
            label: m.stock_level().label().to_string(),
        })
        .collect();
    alerts.sort_by(|a, b| a.name.cmp(&b.name));

    DashboardSummary {
        active_raw_materials: active.len() as i64,
        orders_today,
        low_stock_count: alerts.len() as i64,
        alerts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn material(name: &str, quantity: i64, min: i64, active: bool) -> RawMaterial {
        let now = Utc::now();
        RawMaterial {
            id: format!("mp-{}", name),
            name: name.to_string(),
            reference: None,
            barcode: None,
            category: None,
            unit: Unit::Kilogram,
            quantity_milli: quantity * 1000,
            min_stock_milli: min * 1000,
            supplier_id: None,
            supplier_name: None,
            expiry_date: None,
            is_active: active,
            created_at: now,
            updated_at: now,
            created_by: "u".to_string(),
        }
    }

    #[test]
    fn test_alert_count_matches_low_stock_materials() {
        let materials = vec![
            material("Tomates", 10, 5, true),
            material("Sel", 5, 5, true),
            material("Basilic", 0, 1, true),
            material("Oignons", 2, 3, false),
        ];

        let summary = summarize(&materials, 4);
        assert_eq!(summary.active_raw_materials, 3);
        assert_eq!(summary.orders_today, 4);
        assert_eq!(summary.low_stock_count, 2);

        let names: Vec<&str> = summary.alerts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Basilic", "Sel"]);
        assert_eq!(summary.alerts[0].level, StockLevel::Rupture);
        assert_eq!(summary.alerts[1].level, StockLevel::Faible);
        assert_eq!(summary.alerts[1].label, "Stock faible");
    }

    #[test]
    fn test_empty_catalog() {
        let summary = summarize(&[], 0);
        assert_eq!(summary.active_raw_materials, 0);
        assert!(summary.alerts.is_empty());
    }
}
