//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units                                      │
//! │    Every price, subtotal, total and payment is an i64 in the            │
//! │    smallest currency unit. Receipts never drift by a cent.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::money::Money;
//!
//! let price = Money::from_minor(5000);
//! let subtotal = price.times(3).unwrap();
//! assert_eq!(subtotal.minor(), 15000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for expense balances
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support, serialized as a bare number so the
///   JSON wire format matches the original API (`"price": 5000`)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from the smallest currency unit.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the value in the smallest currency unit.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Checks if the amount is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity, failing on overflow.
    ///
    /// ## Usage
    /// Line totals: `unit_price.times(quantity)`. Overflow is a hard error,
    /// never a silent wrap.
    #[inline]
    pub fn times(self, quantity: i64) -> Option<Money> {
        self.0.checked_mul(quantity).map(Money)
    }

    /// Adds another amount, failing on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts another amount, saturating at the i64 boundary.
    #[inline]
    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

// =============================================================================
// Arithmetic Operators
// =============================================================================
// Plain operators panic on overflow in debug builds just like i64.
// Use `times`/`checked_add` where user-controlled values are involved.

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Money {
    #[inline]
    fn from(minor: i64) -> Self {
        Money(minor)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let price = Money::from_minor(5000);
        assert_eq!(price.minor(), 5000);
    }

    #[test]
    fn test_times() {
        let price = Money::from_minor(5000);
        assert_eq!(price.times(3), Some(Money::from_minor(15000)));
        assert_eq!(Money::from_minor(i64::MAX).times(2), None);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1000, 2500, 500]
            .into_iter()
            .map(Money::from_minor)
            .sum();
        assert_eq!(total.minor(), 4000);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(15000);
        let b = Money::from_minor(10000);
        assert_eq!((a - b).minor(), 5000);
        assert_eq!((a + b).minor(), 25000);
        assert!((b - a).is_negative());
    }

    #[test]
    fn test_serde_transparent() {
        let price = Money::from_minor(5000);
        assert_eq!(serde_json::to_string(&price).unwrap(), "5000");

        let parsed: Money = serde_json::from_str("15000").unwrap();
        assert_eq!(parsed, Money::from_minor(15000));
    }
}
