//! # fabstock-db: Database Layer for fabstock
//!
//! This crate is the document store of fabstock: an embedded SQLite database
//! accessed through sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        fabstock Data Flow                               │
//! │                                                                         │
//! │  HTTP handler (POST /api/raw-materials/{id}/adjustments)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StockLedgerService ── fabstock-core::ledger::plan_adjustment           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fabstock-db (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌─────────────┐ │   │
//! │  │   │   Database    │    │  Repositories      │  │ Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                    │  │ (embedded)  │ │   │
//! │  │   │ SqlitePool    │◄───│ RawMaterialRepo    │  │ 001_initial │ │   │
//! │  │   │               │    │ MovementRepo       │  │             │ │   │
//! │  │   │               │    │ ManufacturingOrder │  │             │ │   │
//! │  │   │               │    │ FinishedProduct    │  │             │ │   │
//! │  │   │               │    │ Supplier           │  │             │ │   │
//! │  │   └───────────────┘    └────────────────────┘  └─────────────┘ │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (WAL) or :memory: in tests                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fabstock_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fabstock.db")).await?;
//! let materials = db.raw_materials().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

pub use repository::{
    FinishedProductRepository, ManufacturingOrderRepository, MovementRepository,
    RawMaterialRepository, SupplierRepository,
};
