//! # Services
//!
//! One coordinating service per domain area, built once at startup and
//! injected into the router through [`AppState`](crate::state::AppState).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockLedgerService   raw materials, adjustments, movement history      │
//! │  ProductionService    manufacturing orders (create → launch → finish)   │
//! │  CatalogService       finished products, suppliers                      │
//! │  ScanService          barcode resolution ──► StockLedgerService         │
//! │  DashboardService     counters and low-stock alerts                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Services validate with fabstock-core, persist with fabstock-db and report
//! every outcome through `tracing`. Only `ScanService` calls another service.

pub mod catalog;
pub mod dashboard;
pub mod production;
pub mod scan;
pub mod stock_ledger;

pub use catalog::{CatalogService, CreateFinishedProductInput, CreateSupplierInput};
pub use dashboard::DashboardService;
pub use production::{CreateOrderInput, FinishOrderInput, ProductionService};
pub use scan::{ScanCreateInput, ScanService};
pub use stock_ledger::{AdjustmentInput, AdjustmentResult, CreateRawMaterialInput, StockLedgerService};
