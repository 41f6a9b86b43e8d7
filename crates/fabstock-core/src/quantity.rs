//! # Quantity Module
//!
//! Provides the `Quantity` type for stock levels and stock deltas.
//!
//! ## Why Fixed-Point Quantities?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Stock entered from a form as floats:                                   │
//! │    10.1 KG + 0.2 KG = 10.299999999999999 KG  ❌ WRONG!                   │
//! │                                                                         │
//! │  A ledger that drifts by a few micro-grams eventually shows             │
//! │  "-0.0000001 KG" and refuses a legitimate exit.                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer thousandths                                      │
//! │    10.1 KG = 10100, 0.2 KG = 200 → 10300 (exactly 10.3 KG)              │
//! │    1 KG = 1000 g, 1 LITRE = 1000 mL, 1 UNITE = 1000 milli-units         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fabstock_core::quantity::Quantity;
//!
//! let stock: Quantity = "10.1".parse().unwrap();
//! let delta = Quantity::from_milli(200);
//!
//! assert_eq!((stock + delta).to_string(), "10.3");
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of stored sub-units per whole unit.
pub const MILLI_PER_UNIT: i64 = 1000;

// =============================================================================
// Quantity Type
// =============================================================================

/// A quantity of stock in thousandths of its unit (KG, LITRE, UNITE, CARTON).
///
/// ## Design Decisions
/// - **i64 (signed)**: the ledger computes `current - delta` before checking
///   the result, so intermediate values may be negative
/// - **Serialized as a decimal number**: the browser sends and receives
///   `12.5`, never `12500`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Quantity(i64);

impl Quantity {
    /// Creates a quantity from thousandths of a unit.
    ///
    /// ```rust
    /// use fabstock_core::quantity::Quantity;
    ///
    /// let q = Quantity::from_milli(2500); // 2.5 KG
    /// assert_eq!(q.milli(), 2500);
    /// ```
    #[inline]
    pub const fn from_milli(milli: i64) -> Self {
        Quantity(milli)
    }

    /// Creates a quantity from a whole number of units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Quantity(units * MILLI_PER_UNIT)
    }

    /// Returns the raw value in thousandths.
    #[inline]
    pub const fn milli(&self) -> i64 {
        self.0
    }

    /// Returns the value as a decimal number (display and JSON only).
    #[inline]
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / MILLI_PER_UNIT as f64
    }

    /// Zero quantity.
    #[inline]
    pub const fn zero() -> Self {
        Quantity(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Checked addition, `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Quantity)
    }

    /// Checked subtraction, `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Quantity)
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses form input such as `"12"`, `"12.5"`, `"0,125"` or `"-3.2"`.
///
/// A comma is accepted as the decimal separator. More than three decimals is
/// rejected rather than silently rounded.
impl FromStr for Quantity {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "quantity".to_string(),
            reason: reason.to_string(),
        };

        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "quantity".to_string(),
            });
        }

        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };

        let normalized = digits.replace(',', ".");
        let (whole, frac) = match normalized.split_once('.') {
            Some((w, f)) => (w, f),
            None => (normalized.as_str(), ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }
        if frac.len() > 3 {
            return Err(invalid("at most 3 decimals"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("too large"))?
        };
        let frac_milli: i64 = if frac.is_empty() {
            0
        } else {
            // "5" → 500, "25" → 250, "125" → 125
            let padded = format!("{:0<3}", frac);
            padded.parse().map_err(|_| invalid("must be a decimal number"))?
        };

        let milli = whole
            .checked_mul(MILLI_PER_UNIT)
            .and_then(|w| w.checked_add(frac_milli))
            .ok_or_else(|| invalid("too large"))?;

        Ok(Quantity(if negative { -milli } else { milli }))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shortest decimal form: `15`, `2.5`, `0.125`.
impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / MILLI_PER_UNIT as u64;
        let frac = abs % MILLI_PER_UNIT as u64;

        if frac == 0 {
            write!(f, "{}{}", sign, whole)
        } else {
            let frac = format!("{:03}", frac);
            write!(f, "{}{}.{}", sign, whole, frac.trim_end_matches('0'))
        }
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

/// JSON numbers go through the same parser as form input, so `1.0004` is
/// rejected instead of being recorded as `1`. `f64`'s `Display` is the
/// shortest text that reads back to the same value and never uses an
/// exponent.
impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        if !value.is_finite() {
            return Err(serde::de::Error::custom("quantity must be a finite number"));
        }
        value.to_string().parse().map_err(serde::de::Error::custom)
    }
}

impl Add for Quantity {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Quantity(self.0 + other.0)
    }
}

impl Sub for Quantity {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Quantity(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
