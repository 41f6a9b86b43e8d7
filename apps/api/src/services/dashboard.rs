//! # Dashboard Service
//!
//! Read-only counters for the home screen. Nothing is stored.

use chrono::Local;
use tracing::debug;

use fabstock_core::dashboard::summarize;
use fabstock_core::order::start_of_day;
use fabstock_core::DashboardSummary;
use fabstock_db::Database;

use crate::error::ApiResult;

#[derive(Debug, Clone)]
pub struct DashboardService {
    db: Database,
}

impl DashboardService {
    pub fn new(db: Database) -> Self {
        DashboardService { db }
    }

    /// Active raw materials, orders created since local midnight and the
    /// low-stock alerts (quantity at or under the minimum).
    pub async fn summary(&self) -> ApiResult<DashboardSummary> {
        let materials = self.db.raw_materials().list_active().await?;
        let orders_today = self
            .db
            .orders()
            .count_created_since(start_of_day(&Local::now()))
            .await?;

        let summary = summarize(&materials, orders_today);
        debug!(
            materials = summary.active_raw_materials,
            orders_today = summary.orders_today,
            alerts = summary.low_stock_count,
            "Dashboard computed"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::stock_ledger::{CreateRawMaterialInput, StockLedgerService};
    use fabstock_core::{Quantity, StockLevel, Unit};
    use fabstock_db::DbConfig;

    #[tokio::test]
    async fn test_alerts_match_low_stock_materials() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let stock = StockLedgerService::new(db.clone());
        let dashboard = DashboardService::new(db);

        for (name, qty, min) in [("Tomates", 10, 5), ("Basilic", 2, 2), ("Sel", 0, 1)] {
            stock
                .create_raw_material(
                    CreateRawMaterialInput {
                        name: name.to_string(),
                        unit: Some(Unit::Kilogram),
                        quantity: Quantity::from_units(qty),
                        min_stock: Quantity::from_units(min),
                        ..Default::default()
                    },
                    "user-1",
                )
                .await
                .unwrap();
        }

        let summary = dashboard.summary().await.unwrap();
        assert_eq!(summary.active_raw_materials, 3);
        assert_eq!(summary.orders_today, 0);
        assert_eq!(summary.low_stock_count, 2);

        let levels: Vec<_> = summary.alerts.iter().map(|a| (a.name.as_str(), a.level)).collect();
        assert_eq!(levels, [("Basilic", StockLevel::Faible), ("Sel", StockLevel::Rupture)]);
    }
}
