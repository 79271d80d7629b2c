//! # Money Module
//!
//! Integer money in paise. Every amount in the system — catalog prices,
//! pinned bill prices, sale totals — flows through this type.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  In floating point:  0.1 + 0.2 = 0.30000000000000004   ❌           │
//! │                                                                     │
//! │  In paise (i64):     10 + 20 = 30                      ✅           │
//! │                                                                     │
//! │  ₹10.00 / 3 = 333 paise (×3 = 999 paise): we KNOW we lost 1 paisa  │
//! │  and handle it explicitly instead of accumulating drift.           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kirana_core::money::Money;
//!
//! let price = Money::from_paise(3000); // ₹30.00
//! let line = price * 3;                // ₹90.00
//! assert_eq!(line.paise(), 9000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest currency unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic intermediates may dip negative even
///   though catalog prices never do
/// - **Single-field tuple struct**: zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees and paise.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees(45, 50).paise(), 4550);
    /// ```
    #[inline]
    pub const fn from_rupees(rupees: i64, paise: i64) -> Self {
        Money(rupees * 100 + paise)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (0-99, absolute).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounding half away from zero.
    ///
    /// Integer math: `(amount * bps + 5000) / 10000`. With the default
    /// zero rate this is always zero, but the representation stays honest
    /// should the rate ever become configurable.
    ///
    /// ```rust
    /// use kirana_core::money::Money;
    /// use kirana_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_paise(1000);
    /// assert_eq!(subtotal.tax_at(TaxRate::from_bps(825)).paise(), 83);
    /// assert_eq!(subtotal.tax_at(TaxRate::zero()).paise(), 0);
    /// ```
    pub fn tax_at(&self, rate: TaxRate) -> Money {
        // i128 intermediate prevents overflow on large amounts
        let tax_paise = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_paise(tax_paise as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rupee formatting. Receipts do their own layout.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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

/// Multiplication by quantity (line totals).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(4550);
        assert_eq!(money.paise(), 4550);
        assert_eq!(money.rupees(), 45);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(3000)), "₹30.00");
        assert_eq!(format!("{}", Money::from_paise(4550)), "₹45.50");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);
    }

    #[test]
    fn test_tax_zero_rate() {
        let subtotal = Money::from_paise(9000);
        assert_eq!(subtotal.tax_at(TaxRate::zero()).paise(), 0);
    }

    #[test]
    fn test_tax_nonzero_rate_rounds() {
        // ₹10.00 at 8.25% = 82.5 paise, rounds to 83
        let subtotal = Money::from_paise(1000);
        assert_eq!(subtotal.tax_at(TaxRate::from_bps(825)).paise(), 83);
    }

    /// Documents the intentional precision behavior: splitting loses
    /// paise explicitly rather than drifting.
    #[test]
    fn test_division_precision_loss_documented() {
        let ten = Money::from_paise(1000);
        let third = Money::from_paise(1000 / 3);
        let reconstructed = third * 3;

        assert_eq!(reconstructed.paise(), 999);
        assert_eq!((ten - reconstructed).paise(), 1);
    }
}
