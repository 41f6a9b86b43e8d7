//! # Application State
//!
//! Built once in `main` and shared by every request.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState (Clone, cheap: every field wraps the same SqlitePool)         │
//! │                                                                         │
//! │   db ─────────┬──► StockLedgerService ◄──┐                              │
//! │               ├──► ProductionService     │                              │
//! │               ├──► CatalogService        │                              │
//! │               ├──► ScanService ──────────┘                              │
//! │               └──► DashboardService                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fabstock_db::Database;

use crate::services::{CatalogService, DashboardService, ProductionService, ScanService, StockLedgerService};

#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub stock: StockLedgerService,
    pub production: ProductionService,
    pub catalog: CatalogService,
    pub scan: ScanService,
    pub dashboard: DashboardService,
}

impl AppState {
    /// Wires every service onto `db`.
    pub fn new(db: Database) -> Self {
        let stock = StockLedgerService::new(db.clone());

        AppState {
            production: ProductionService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            scan: ScanService::new(db.clone(), stock.clone()),
            dashboard: DashboardService::new(db.clone()),
            stock,
            db,
        }
    }
}
