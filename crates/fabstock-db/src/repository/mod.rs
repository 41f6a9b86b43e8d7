//! # Repository Module
//!
//! One repository per table. Repositories only store and fetch; every rule
//! (non-negative stock, legal transitions, required fields) is checked in
//! fabstock-core before a repository is called.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Service (apps/api)                                                     │
//! │       │                                                                 │
//! │       │  db.raw_materials().apply_adjustment(&plan, &movement)          │
//! │       ▼                                                                 │
//! │  RawMaterialRepository                                                  │
//! │  ├── list_active / get_by_id / find_active_by_barcode                   │
//! │  ├── insert / soft_delete                                               │
//! │  └── apply_adjustment  (UPDATE … WHERE quantity = previous + INSERT)    │
//! │       │                                                                 │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`RawMaterialRepository`] - Raw materials and the transactional ledger write
//! - [`MovementRepository`] - Append-only stock movements
//! - [`FinishedProductRepository`] - Finished product catalog
//! - [`SupplierRepository`] - Supplier catalog
//! - [`ManufacturingOrderRepository`] - Orders, numbering, conditional transitions

pub mod finished_product;
pub mod manufacturing_order;
pub mod movement;
pub mod raw_material;
pub mod supplier;

pub use finished_product::FinishedProductRepository;
pub use manufacturing_order::ManufacturingOrderRepository;
pub use movement::MovementRepository;
pub use raw_material::RawMaterialRepository;
pub use supplier::SupplierRepository;

/// Generates a new record ID (UUID v4).
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

// =============================================================================
// Test Fixtures
// =============================================================================
