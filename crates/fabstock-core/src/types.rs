//! # Domain Types
//!
//! Core domain types used throughout fabstock.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  RawMaterial    │   │ StockMovement   │   │ ManufacturingOrder│     │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │◄──│  product_id     │   │  order_number   │       │
//! │  │  barcode        │   │  previous/new   │   │  status         │       │
//! │  │  quantity_milli │   │  (append-only)  │   │  product snapshot│      │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ FinishedProduct │   │    Supplier     │   │   OrderStatus   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  reference      │   │  delivery days  │   │  Planned        │       │
//! │  │  target_stock   │   │  contact info   │   │  InProgress     │       │
//! │  └─────────────────┘   └─────────────────┘   │  Finished       │       │
//! │                                              │  Cancelled      │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Cross-entity links are copied at write time, never joined at read time:
//! an order keeps the product name/reference it was created for and a movement
//! keeps the product name and unit it was recorded against. Renaming a product
//! later does not rewrite history.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::quantity::Quantity;

// =============================================================================
// Unit
// =============================================================================

/// Unit a raw material is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum Unit {
    #[serde(rename = "KG")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "KG"))]
    Kilogram,
    #[serde(rename = "LITRE")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "LITRE"))]
    Litre,
    #[serde(rename = "UNITE")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "UNITE"))]
    Unite,
    #[serde(rename = "CARTON")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "CARTON"))]
    Carton,
}

impl Unit {
    /// The stored and displayed tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Unit::Kilogram => "KG",
            Unit::Litre => "LITRE",
            Unit::Unite => "UNITE",
            Unit::Carton => "CARTON",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Movement Type / Product Kind
// =============================================================================

/// Direction of a stock adjustment.
///
/// The browser historically sent `entree`/`sortie`; both spellings are
/// accepted on input, output is always `entry`/`exit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    #[serde(alias = "entree")]
    Entry,
    #[serde(alias = "sortie")]
    Exit,
}

impl MovementType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entry => "entry",
            MovementType::Exit => "exit",
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which catalog a movement or scan result points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    RawMaterial,
    FinishedProduct,
}

// =============================================================================
// Stock Level
// =============================================================================

/// Derived stock status shown next to each raw material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    /// Nothing left.
    Rupture,
    /// At or under the minimum threshold.
    Faible,
    Normal,
}

impl StockLevel {
    /// Classifies a quantity against its minimum threshold.
    ///
    /// ```rust
    /// use fabstock_core::quantity::Quantity;
    /// use fabstock_core::types::StockLevel;
    ///
    /// let min = Quantity::from_units(5);
    /// assert_eq!(StockLevel::classify(Quantity::zero(), min), StockLevel::Rupture);
    /// assert_eq!(StockLevel::classify(Quantity::from_units(5), min), StockLevel::Faible);
    /// assert_eq!(StockLevel::classify(Quantity::from_units(6), min), StockLevel::Normal);
    /// ```
    pub fn classify(quantity: Quantity, min_stock: Quantity) -> Self {
        if quantity.milli() <= 0 {
            StockLevel::Rupture
        } else if quantity <= min_stock {
            StockLevel::Faible
        } else {
            StockLevel::Normal
        }
    }

    /// French label used by the UI.
    pub const fn label(&self) -> &'static str {
        match self {
            StockLevel::Rupture => "Rupture",
            StockLevel::Faible => "Stock faible",
            StockLevel::Normal => "Normal",
        }
    }
}

// =============================================================================
// Order Status / Priority
// =============================================================================

/// Lifecycle state of a manufacturing order (OF).
///
/// ## State Machine
/// ```text
///   ┌─────────┐  launch   ┌─────────────┐  finish   ┌──────────┐
///   │ Planned │──────────►│ InProgress  │──────────►│ Finished │
///   └────┬────┘           └─────────────┘           └──────────┘
///        │ cancel
///        ▼
///   ┌───────────┐
///   │ Cancelled │   (Finished and Cancelled are terminal)
///   └───────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[serde(alias = "planifie")]
    Planned,
    #[serde(alias = "en_cours")]
    InProgress,
    #[serde(alias = "termine")]
    Finished,
    #[serde(alias = "annule")]
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Planned => "planned",
            OrderStatus::InProgress => "in_progress",
            OrderStatus::Finished => "finished",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Whether `self → next` is an edge of the state machine.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Planned, OrderStatus::InProgress)
                | (OrderStatus::Planned, OrderStatus::Cancelled)
                | (OrderStatus::InProgress, OrderStatus::Finished)
        )
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Finished | OrderStatus::Cancelled)
    }
}

impl Default for OrderStatus {
    fn default() -> Self {
        OrderStatus::Planned
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "normale")]
    Normal,
    #[serde(alias = "haute")]
    High,
    #[serde(alias = "urgente")]
    Urgent,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

// =============================================================================
// Scrap Rate
// =============================================================================

/// Scrap rate recorded when an order finishes, in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 400 bps = 4.00%. Operators type a percentage
/// with up to two decimals, which converts without loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScrapRate(u32);

impl ScrapRate {
    /// Upper bound: 100%.
    pub const MAX_BPS: u32 = 10_000;

    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ScrapRate(bps)
    }

    /// Converts a percentage such as `4.0`. Returns `None` outside 0..=100.
    pub fn from_percentage(pct: f64) -> Option<Self> {
        if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
            return None;
        }
        Some(ScrapRate((pct * 100.0).round() as u32))
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Raw Material
// =============================================================================

/// A raw material (MP) tracked by the stock ledger.
///
/// `quantity_milli` is only ever written by the ledger's adjustment path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RawMaterial {
    /// Unique identifier (UUID v4).
    pub id: String,
    pub name: String,
    /// Internal article reference.
    pub reference: Option<String>,
    /// Exact-match key for the scanner.
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub unit: Unit,
    /// Current stock in thousandths of `unit`.
    pub quantity_milli: i64,
    /// Alert threshold in thousandths of `unit`.
    pub min_stock_milli: i64,
    pub supplier_id: Option<String>,
    /// Supplier name snapshot for display.
    pub supplier_name: Option<String>,
    /// DLC (best-before date).
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    /// Whether material is active (soft delete).
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

impl RawMaterial {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    #[inline]
    pub fn min_stock(&self) -> Quantity {
        Quantity::from_milli(self.min_stock_milli)
    }

    pub fn stock_level(&self) -> StockLevel {
        StockLevel::classify(self.quantity(), self.min_stock())
    }

    /// At or under the minimum threshold, which includes out of stock.
    pub fn is_low_stock(&self) -> bool {
        self.quantity() <= self.min_stock()
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// One append-only ledger entry.
///
/// Captures the stock before and after so the audit trail stands on its own
/// even if the product is later renamed or deactivated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: String,
    pub movement_type: MovementType,
    pub product_id: String,
    pub product_kind: ProductKind,
    /// Product name at time of movement (frozen).
    pub product_name: String,
    /// Delta, always positive; direction is `movement_type`.
    pub quantity_milli: i64,
    pub previous_stock_milli: i64,
    pub new_stock_milli: i64,
    pub unit: Unit,
    pub reason: String,
    pub user_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    #[inline]
    pub fn quantity(&self) -> Quantity {
        Quantity::from_milli(self.quantity_milli)
    }

    #[inline]
    pub fn previous_stock(&self) -> Quantity {
        Quantity::from_milli(self.previous_stock_milli)
    }

    #[inline]
    pub fn new_stock(&self) -> Quantity {
        Quantity::from_milli(self.new_stock_milli)
    }
}

// =============================================================================
// Finished Product
// =============================================================================

/// A finished product (PF) that manufacturing orders produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FinishedProduct {
    pub id: String,
    pub name: String,
    pub reference: String,
    pub barcode: Option<String>,
    pub category: Option<String>,
    /// Free-text unit of production ("pot", "bocal 500g", ...).
    pub production_unit: Option<String>,
    /// Estimated production time per batch, in minutes.
    pub production_time_minutes: Option<i64>,
    pub target_stock: i64,
    /// Informational; not written by order completion.
    pub current_stock: i64,
    /// Sale price in cents.
    pub sale_price_cents: Option<i64>,
    pub production_instructions: Option<String>,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier. Reference data only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: String,
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// Average delivery delay, in days.
    pub average_delivery_days: i64,
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
}

// =============================================================================
// Manufacturing Order
// =============================================================================

/// A manufacturing order (OF).
///
/// The finished product is a snapshot taken at creation: `finished_product_id`
/// is kept for lookups, name and reference are frozen copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ManufacturingOrder {
    pub id: String,
    /// `OF-YYYYMMDD-NNN`.
    pub order_number: String,
    pub finished_product_id: String,
    pub finished_product_name: String,
    pub finished_product_reference: String,
    /// Units to produce.
    pub quantity: i64,
    /// Units actually produced, set on completion.
    pub quantity_produced: Option<i64>,
    #[ts(as = "Option<String>")]
    pub expected_completion_date: Option<NaiveDate>,
    pub priority: Priority,
    pub instructions: Option<String>,
    pub status: OrderStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub launched_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub completed_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_by: String,
    /// Operator who launched the order.
    pub operator_id: Option<String>,
    /// Scrap rate in basis points, set on completion.
    pub scrap_rate_bps: Option<i64>,
    pub observations: Option<String>,
}

impl ManufacturingOrder {
    pub fn scrap_rate(&self) -> Option<ScrapRate> {
        self.scrap_rate_bps
            .and_then(|bps| u32::try_from(bps).ok())
            .map(ScrapRate::from_bps)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
