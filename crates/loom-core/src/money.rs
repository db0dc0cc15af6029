//! # Money Module
//!
//! Provides the `Money` type for monetary values.
//!
//! ## Integer Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Prices, costs, discounts and ledger amounts are whole currency units   │
//! │  (the store prices in rupees, never paisa).                             │
//! │                                                                         │
//! │    Product.currentPrice ──► SaleItem.originalPrice ──► lineTotal        │
//! │    cart discount ─────────► distribute_discount ─────► item.discount    │
//! │    LedgerEntry.amount ────► apply_payment ───────────► remainingAmount  │
//! │                                                                         │
//! │  The only fractional value is a line's per-unit final price, which is   │
//! │  kept as f64 for display and never fed back into sums.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use loom_core::money::Money;
//!
//! let price = Money::from_units(1000);
//! let line = price * 2;
//! assert_eq!(line.units(), 2000);
//! assert_eq!(line.format_with("Rs"), "Rs 2,000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in whole currency units.
///
/// ## Design Decisions
/// - **i64 (signed)**: ledgers and losses may go negative
/// - **Newtype serde**: stored and sent as a plain JSON number
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole currency units.
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units)
    }

    /// Returns the value in whole currency units.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Clamps negative values to zero.
    ///
    /// ## Example
    /// ```rust
    /// use loom_core::money::Money;
    ///
    /// let over_discounted = Money::from_units(100) - Money::from_units(150);
    /// assert_eq!(over_discounted.floor_zero(), Money::zero());
    /// ```
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            Money(self.0)
        }
    }

    /// Calculates tax with half-up integer rounding.
    ///
    /// ## Implementation
    /// `(amount * bps + 5000) / 10000`, the +5000 being half of the divisor.
    ///
    /// ## Example
    /// ```rust
    /// use loom_core::money::Money;
    /// use loom_core::types::TaxRate;
    ///
    /// let taxable = Money::from_units(2200);
    /// let tax = taxable.calculate_tax(TaxRate::from_bps(1700)); // 17%
    /// assert_eq!(tax.units(), 374);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so large amounts at high rates cannot overflow
        let tax = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_units(tax as i64)
    }

    /// Multiplies by a percentage and rounds to the nearest unit.
    ///
    /// Used for commission (`total × rate / 100`).
    ///
    /// ## Example
    /// ```rust
    /// use loom_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(2050).percentage_of(2.5).units(), 51);
    /// ```
    pub fn percentage_of(&self, percent: f64) -> Money {
        Money((self.0 as f64 * percent / 100.0).round() as i64)
    }

    /// Returns this amount as a percentage of `whole`, or 0 when `whole` is zero.
    pub fn ratio_percent(&self, whole: Money) -> f64 {
        if whole.0 == 0 {
            0.0
        } else {
            self.0 as f64 / whole.0 as f64 * 100.0
        }
    }

    /// Formats the amount with a currency symbol and thousands separators.
    ///
    /// ## Example
    /// ```rust
    /// use loom_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(1250000).format_with("Rs"), "Rs 1,250,000");
    /// assert_eq!(Money::from_units(-450).format_with("Rs"), "-Rs 450");
    /// ```
    pub fn format_with(&self, symbol: &str) -> String {
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        let sign = if self.0 < 0 { "-" } else { "" };
        if symbol.is_empty() {
            format!("{}{}", sign, grouped)
        } else {
            format!("{}{} {}", sign, symbol, grouped)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain number, no symbol. Use [`Money::format_with`] for display.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity. Saturates at the `i64` bounds; inputs that
/// passed validation never get near them.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let a = Money::from_units(1000);
        let b = Money::from_units(500);

        assert_eq!((a + b).units(), 1500);
        assert_eq!((a - b).units(), 500);
        assert_eq!((a * 3).units(), 3000);
        assert_eq!((-a).units(), -1000);
    }

    #[test]
    fn test_mul_saturates() {
        assert_eq!((Money::from_units(i64::MAX / 2 + 1) * 2).units(), i64::MAX);
        assert_eq!((Money::from_units(-i64::MAX) * 2).units(), i64::MIN);
    }

    #[test]
    fn test_sum() {
        let amounts = vec![Money::from_units(10), Money::from_units(20), Money::from_units(5)];
        let total: Money = amounts.iter().sum();
        assert_eq!(total.units(), 35);
    }

    #[test]
    fn test_serializes_as_plain_number() {
        let json = serde_json::to_string(&Money::from_units(2500)).unwrap();
        assert_eq!(json, "2500");

        let back: Money = serde_json::from_str("2500").unwrap();
        assert_eq!(back.units(), 2500);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        // 150 at 1% = 1.5 → 2
        let tax = Money::from_units(150).calculate_tax(TaxRate::from_bps(100));
        assert_eq!(tax.units(), 2);

        let none = Money::from_units(150).calculate_tax(TaxRate::zero());
        assert!(none.is_zero());
    }

    #[test]
    fn test_percentage_of_rounds() {
        assert_eq!(Money::from_units(60000).percentage_of(2.0).units(), 1200);
        assert_eq!(Money::from_units(333).percentage_of(1.5).units(), 5);
    }

    #[test]
    fn test_ratio_percent_zero_whole() {
        assert_eq!(Money::from_units(10).ratio_percent(Money::zero()), 0.0);
        assert_eq!(Money::from_units(25).ratio_percent(Money::from_units(100)), 25.0);
    }

    #[test]
    fn test_format_with_grouping() {
        assert_eq!(Money::from_units(0).format_with("Rs"), "Rs 0");
        assert_eq!(Money::from_units(999).format_with("Rs"), "Rs 999");
        assert_eq!(Money::from_units(1000).format_with("Rs"), "Rs 1,000");
        assert_eq!(Money::from_units(123456).format_with(""), "123,456");
    }

    #[test]
    fn test_floor_zero() {
        assert_eq!(Money::from_units(-5).floor_zero(), Money::zero());
        assert_eq!(Money::from_units(5).floor_zero().units(), 5);
    }
}
