//! # fabstock-core: Pure Business Logic for fabstock
//!
//! This crate holds every rule of the stock ledger and the manufacturing
//! order lifecycle as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        fabstock Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser UI                                   │   │
//! │  │    Stock ──► Production ──► Catalogs ──► Scan ──► Dashboard     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │    services: StockLedger, Production, Catalog, Scan, Dashboard  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fabstock-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  ledger  │ │  order   │ │ barcode/dashboard│  │   │
//! │  │   │ entities │ │ Δ stock  │ │ OF state │ │  scan precedence │  │   │
//! │  │   │  enums   │ │ movement │ │ numbering│ │  low-stock alerts│  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    fabstock-db (Database Layer)                 │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities and closed enums (RawMaterial, ManufacturingOrder, ...)
//! - [`quantity`] - Fixed-point stock quantities (thousandths, no floats)
//! - [`ledger`] - Stock adjustment arithmetic and movement records
//! - [`order`] - Manufacturing order numbering and transitions
//! - [`barcode`] - Scan result type and lookup precedence
//! - [`dashboard`] - Low-stock alerts and counters
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: ids and timestamps are passed in, never generated here
//! 2. **Integer Quantities**: stock is i64 thousandths to avoid float drift
//! 3. **Closed Enums**: status, unit, direction and priority are exhaustive
//! 4. **Explicit Errors**: all rejections are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use fabstock_core::ledger::apply_delta;
//! use fabstock_core::{MovementType, Quantity, Unit};
//!
//! let stock = Quantity::from_units(10);
//! let new = apply_delta("Tomates", Unit::Kilogram, stock, Quantity::from_units(5), MovementType::Entry)?;
//! assert_eq!(new.to_string(), "15");
//! # Ok::<(), fabstock_core::CoreError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod barcode;
pub mod dashboard;
pub mod error;
pub mod ledger;
pub mod order;
pub mod quantity;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use barcode::ScanResult;
pub use dashboard::{DashboardSummary, StockAlert};
pub use error::{CoreError, CoreResult, ValidationError};
pub use quantity::Quantity;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity accepted on a single manufacturing order.
///
/// Guards against typing 50000 instead of 500.
pub const MAX_ORDER_QUANTITY: i64 = 1_000_000;

/// Default page size for order and movement listings.
pub const DEFAULT_LIST_LIMIT: i64 = 50;

/// Upper bound on any caller-provided page size.
pub const MAX_LIST_LIMIT: i64 = 500;
