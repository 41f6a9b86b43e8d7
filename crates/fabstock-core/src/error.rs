//! # Error Types
//!
//! Domain-specific error types for fabstock-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fabstock-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule rejections                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  fabstock-db errors (separate crate)                                    │
//! │  └── DbError          - Store failures, stale writes                    │
//! │                                                                         │
//! │  HTTP API errors (in apps/api)                                          │
//! │  └── ApiError         - What the browser sees (JSON + status)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Browser       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every rejection in this crate happens before any write, so a caller that
//! receives one of these errors knows the store was left untouched.

use thiserror::Error;

use crate::types::{OrderStatus, Unit};

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations raised by the ledger and the order lifecycle.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// An exit would drive the stock below zero.
    ///
    /// ## User Workflow
    /// ```text
    /// Sortie 20 KG on "Tomates" (stock 10 KG)
    ///      │
    ///      ▼
    /// 10 - 20 = -10 < 0
    ///      │
    ///      ▼
    /// InsufficientStock { product: "Tomates", available: "10", requested: "20" }
    ///      │
    ///      ▼
    /// UI shows: "Stock insuffisant" and nothing is written
    /// ```
    #[error("Insufficient stock for {product}: available {available} {unit}, requested {requested} {unit}")]
    InsufficientStock {
        product: String,
        available: String,
        requested: String,
        unit: Unit,
    },

    /// A stock delta that is zero or negative.
    #[error("Invalid quantity: {reason}")]
    InvalidQuantity { reason: String },

    /// The order is not in a state that allows the requested transition.
    #[error("Order {order_number} is {from}, cannot move to {to}")]
    InvalidTransition {
        order_number: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// A referenced record does not exist or is no longer active.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for [`CoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while checking form input, before business logic runs.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Unparseable value (bad number, bad email, bad barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product: "Tomates".to_string(),
            available: "10".to_string(),
            requested: "20".to_string(),
            unit: Unit::Kilogram,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Tomates: available 10 KG, requested 20 KG"
        );

        let err = CoreError::InvalidTransition {
            order_number: "OF-20240315-001".to_string(),
            from: OrderStatus::Finished,
            to: OrderStatus::InProgress,
        };
        assert_eq!(
            err.to_string(),
            "Order OF-20240315-001 is finished, cannot move to in_progress"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "scrap_rate".to_string(),
            min: 0,
            max: 100,
        };
        assert_eq!(err.to_string(), "scrap_rate must be between 0 and 100");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reference".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_not_found_helper() {
        let err = CoreError::not_found("Finished product", "abc");
        assert_eq!(err.to_string(), "Finished product not found: abc");
    }
}
