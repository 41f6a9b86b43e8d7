//! # Validation Module
//!
//! Input validation for catalog forms, ledger adjustments and order
//! transitions.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser form                                                  │
//! │  ├── required attributes, number inputs                                 │
//! │  └── Immediate user feedback                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP service (Rust)                                           │
//! │  ├── Type validation (deserialization)                                  │
//! │  └── THIS MODULE: required text, ranges, formats                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK (quantity_milli >= 0)                             │
//! │  └── UNIQUE (order_number)                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validators that accept free text return the trimmed value so callers
//! store what they checked.

use crate::error::ValidationError;
use crate::quantity::Quantity;
use crate::types::ScrapRate;
use crate::{MAX_LIST_LIMIT, MAX_ORDER_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_NAME_LEN: usize = 200;
const MAX_REFERENCE_LEN: usize = 50;
const MAX_BARCODE_LEN: usize = 64;
const MAX_DELIVERY_DAYS: i64 = 365;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and rejects it when empty or longer than `max` characters.
pub fn validate_required(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a display name (raw material, finished product, supplier).
///
/// ```rust
/// use fabstock_core::validation::validate_name;
///
/// assert_eq!(validate_name("  Tomates ").unwrap(), "Tomates");
/// assert!(validate_name("").is_err());
/// ```
pub fn validate_name(name: &str) -> ValidationResult<String> {
    validate_required("name", name, MAX_NAME_LEN)
}

/// Validates an article reference.
pub fn validate_reference(reference: &str) -> ValidationResult<String> {
    validate_required("reference", reference, MAX_REFERENCE_LEN)
}

/// Normalises optional free text: blank becomes `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Validates a scanned or typed barcode.
///
/// ## Rules
/// - Leading/trailing whitespace is dropped (scanners often append CR/LF)
/// - Must not be empty
/// - No inner whitespace, at most 64 characters
pub fn validate_barcode(code: &str) -> ValidationResult<String> {
    let code = validate_required("barcode", code, MAX_BARCODE_LEN)?;

    if code.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "barcode".to_string(),
            reason: "must not contain spaces".to_string(),
        });
    }

    Ok(code)
}

/// Optional barcode: blank means none, otherwise it must be valid.
pub fn validate_optional_barcode(code: Option<&str>) -> ValidationResult<Option<String>> {
    match optional_text(code) {
        Some(code) => validate_barcode(&code).map(Some),
        None => Ok(None),
    }
}

/// Validates an optional email: when present it must contain `@`.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(email) = optional_text(email) else {
        return Ok(None);
    };

    let valid = email
        .split_once('@')
        .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty());
    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must contain @".to_string(),
        });
    }

    Ok(Some(email))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Stock quantities stored on a record (opening stock, minimum threshold)
/// may be zero but never negative.
pub fn validate_stock_quantity(field: &str, quantity: Quantity) -> ValidationResult<()> {
    if quantity.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX / 1000,
        });
    }
    Ok(())
}

/// Validates the quantity of a manufacturing order.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ORDER_QUANTITY (typing guard)
pub fn validate_order_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ORDER_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ORDER_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a scrap-rate percentage (0 to 100).
pub fn validate_scrap_percentage(pct: f64) -> ValidationResult<ScrapRate> {
    ScrapRate::from_percentage(pct).ok_or_else(|| ValidationError::OutOfRange {
        field: "scrap_rate".to_string(),
        min: 0,
        max: 100,
    })
}

pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }
    Ok(())
}

pub fn validate_delivery_days(days: i64) -> ValidationResult<()> {
    if !(0..=MAX_DELIVERY_DAYS).contains(&days) {
        return Err(ValidationError::OutOfRange {
            field: "average_delivery_days".to_string(),
            min: 0,
            max: MAX_DELIVERY_DAYS,
        });
    }
    Ok(())
}

/// Clamps a caller-provided list limit into `1..=MAX_LIST_LIMIT`.
pub fn validate_limit(limit: Option<i64>, default: i64) -> ValidationResult<i64> {
    let limit = limit.unwrap_or(default);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(ValidationError::OutOfRange {
            field: "limit".to_string(),
            min: 1,
            max: MAX_LIST_LIMIT,
        });
    }
    Ok(limit)
}

// =============================================================================
// ID Validators
// =============================================================================

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("Tomates").unwrap(), "Tomates");
        assert_eq!(validate_name("  Huile d'olive ").unwrap(), "Huile d'olive");

        assert!(matches!(
            validate_name("   "),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            validate_name(&"A".repeat(300)),
            Err(ValidationError::TooLong { max: 200, .. })
        ));
    }

    #[test]
    fn test_validate_reference() {
        assert!(validate_reference("SAUCE-TOM-500").is_ok());
        assert!(validate_reference("").is_err());
        assert!(validate_reference(&"R".repeat(51)).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  Légumes ")), Some("Légumes".to_string()));
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn test_validate_barcode() {
        assert_eq!(validate_barcode("3017620422003\r\n").unwrap(), "3017620422003");
        assert!(validate_barcode("").is_err());
        assert!(validate_barcode("301 762").is_err());
        assert_eq!(validate_optional_barcode(Some("")).unwrap(), None);
        assert!(validate_optional_barcode(Some("a b")).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(Some("contact@maraicher.fr")).unwrap(),
            Some("contact@maraicher.fr".to_string())
        );
        assert_eq!(validate_email(Some("")).unwrap(), None);
        assert_eq!(validate_email(None).unwrap(), None);
        assert!(validate_email(Some("maraicher.fr")).is_err());
        assert!(validate_email(Some("@maraicher.fr")).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity("quantity", Quantity::zero()).is_ok());
        assert!(validate_stock_quantity("quantity", Quantity::from_milli(2500)).is_ok());
        assert!(validate_stock_quantity("min_stock", Quantity::from_milli(-1)).is_err());
    }

    #[test]
    fn test_validate_order_quantity() {
        assert!(validate_order_quantity("quantity", 1).is_ok());
        assert!(validate_order_quantity("quantity", 50).is_ok());

        assert!(matches!(
            validate_order_quantity("quantity", 0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(validate_order_quantity("quantity", -3).is_err());
        assert!(validate_order_quantity("quantity", MAX_ORDER_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_validate_scrap_percentage() {
        assert_eq!(validate_scrap_percentage(4.0).unwrap().bps(), 400);
        assert_eq!(validate_scrap_percentage(0.0).unwrap().bps(), 0);
        assert!(validate_scrap_percentage(101.0).is_err());
        assert!(validate_scrap_percentage(f64::NAN).is_err());
    }

    #[test]
    fn test_validate_delivery_days() {
        assert!(validate_delivery_days(0).is_ok());
        assert!(validate_delivery_days(7).is_ok());
        assert!(validate_delivery_days(-1).is_err());
        assert!(validate_delivery_days(400).is_err());
    }

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(None, 50).unwrap(), 50);
        assert_eq!(validate_limit(Some(10), 50).unwrap(), 10);
        assert!(validate_limit(Some(0), 50).is_err());
        assert!(validate_limit(Some(MAX_LIST_LIMIT + 1), 50).is_err());
    }
}
