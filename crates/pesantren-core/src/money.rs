//! # Money Module
//!
//! Provides the `Money` type for rupiah amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SPLITTING A SALE                                                       │
//! │                                                                         │
//! │  Rp 10.500 at 70% yayasan:                                              │
//! │    10500 × 70 / 100 = 7350      yayasan                                 │
//! │    10500 − 7350     = 3150      koperasi (by subtraction)               │
//! │                                                                         │
//! │  Rp 10.001 at 70/30, both floored independently:                        │
//! │    floor(7000.7) = 7000, floor(3000.3) = 3000                           │
//! │    7000 + 3000 = 10000 → Rp 1 lost, and we KNOW it was lost             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rupiah has no minor unit in practice, so one `Money` unit is one rupiah.
//!
//! ## Usage
//! ```rust
//! use pesantren_core::money::Money;
//!
//! let sale = Money::from_rupiah(10_500);
//! assert_eq!(sale.percent_floor(70).rupiah(), 7_350);
//! assert_eq!((sale - sale.percent_floor(70)).rupiah(), 3_150);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in rupiah (the smallest currency unit used here).
///
/// ## Design Decisions
/// - **i64 (signed)**: laba kotor / laba bersih can go negative
/// - **Single field tuple struct**: zero-cost wrapper over i64
/// - **Newtype**: serializes as a bare number, matching the integer
///   columns rows arrive with
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from whole rupiah.
    #[inline]
    pub const fn from_rupiah(rupiah: i64) -> Self {
        Money(rupiah)
    }

    /// Returns the value in rupiah.
    #[inline]
    pub const fn rupiah(&self) -> i64 {
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

    /// Returns `floor(self × percent / 100)`.
    ///
    /// Computed in `i128` so the intermediate product cannot overflow, and
    /// with Euclidean division so negative amounts floor toward negative
    /// infinity instead of truncating toward zero.
    ///
    /// ## Example
    /// ```rust
    /// use pesantren_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupiah(10_001).percent_floor(70).rupiah(), 7_000);
    /// assert_eq!(Money::from_rupiah(10_001).percent_floor(30).rupiah(), 3_000);
    /// assert_eq!(Money::from_rupiah(-5).percent_floor(50).rupiah(), -3);
    /// ```
    pub fn percent_floor(&self, percent: u8) -> Money {
        let scaled = (self.0 as i128 * percent as i128).div_euclid(100);
        // |scaled| <= |self|, so it always fits back into i64
        Money(scaled as i64)
    }

    /// Multiplies a unit cost by a quantity, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use pesantren_core::money::Money;
    ///
    /// let hpp = Money::from_rupiah(5_000);
    /// assert_eq!(hpp.checked_mul_quantity(42), Some(Money::from_rupiah(210_000)));
    /// assert_eq!(Money::from_rupiah(i64::MAX).checked_mul_quantity(2), None);
    /// ```
    #[inline]
    pub fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Multiplies a unit cost by a quantity, clamping at the `i64` bounds.
    ///
    /// Reporting folds use this; a saturated total is still a total, while
    /// dropping the row would not be.
    #[inline]
    pub const fn saturating_mul_quantity(&self, qty: i64) -> Money {
        Money(self.0.saturating_mul(qty))
    }

    /// Checked addition.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Checked subtraction.
    #[inline]
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Saturating addition.
    #[inline]
    pub const fn saturating_add(&self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering. Display formatting with thousands separators
/// belongs to the dashboard, not here.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-Rp{}", self.0.unsigned_abs())
        } else {
            write!(f, "Rp{}", self.0)
        }
    }
}

impl From<i64> for Money {
    fn from(rupiah: i64) -> Self {
        Money(rupiah)
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
    fn test_from_rupiah() {
        let money = Money::from_rupiah(10_500);
        assert_eq!(money.rupiah(), 10_500);
        assert_eq!(Money::from(42).rupiah(), 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_rupiah(10_500).to_string(), "Rp10500");
        assert_eq!(Money::from_rupiah(-250).to_string(), "-Rp250");
        assert_eq!(Money::zero().to_string(), "Rp0");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_rupiah(1000);
        let b = Money::from_rupiah(300);

        assert_eq!((a + b).rupiah(), 1300);
        assert_eq!((a - b).rupiah(), 700);

        let mut c = a;
        c += b;
        c -= Money::from_rupiah(100);
        assert_eq!(c.rupiah(), 1200);
    }

    #[test]
    fn test_percent_floor() {
        let amount = Money::from_rupiah(10_000);
        assert_eq!(amount.percent_floor(70).rupiah(), 7_000);
        assert_eq!(amount.percent_floor(0).rupiah(), 0);
        assert_eq!(amount.percent_floor(100).rupiah(), 10_000);

        // 99 × 33 / 100 = 32.67 → 32
        assert_eq!(Money::from_rupiah(99).percent_floor(33).rupiah(), 32);
    }

    #[test]
    fn test_percent_floor_large_amount_does_not_overflow() {
        let big = Money::from_rupiah(i64::MAX);
        assert_eq!(big.percent_floor(100), big);
        assert_eq!(big.percent_floor(50).rupiah(), i64::MAX / 2);
    }

    #[test]
    fn test_sum() {
        let values = [Money::from_rupiah(1), Money::from_rupiah(2), Money::from_rupiah(3)];
        let by_ref: Money = values.iter().sum();
        let by_value: Money = values.into_iter().sum();
        assert_eq!(by_ref.rupiah(), 6);
        assert_eq!(by_value.rupiah(), 6);
    }

    #[test]
    fn test_saturating_mul_quantity() {
        assert_eq!(
            Money::from_rupiah(i64::MAX).saturating_mul_quantity(3).rupiah(),
            i64::MAX
        );
        assert_eq!(Money::from_rupiah(5_000).saturating_mul_quantity(0), Money::zero());
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(Money::from_rupiah(1).is_positive());
        assert!(Money::from_rupiah(-1).is_negative());
    }

    /// Splitting Rp 10.001 into independently floored 70/30 halves loses
    /// one rupiah. Documented behaviour of the condition split.
    #[test]
    fn test_independent_floor_loses_remainder() {
        let amount = Money::from_rupiah(10_001);
        let kept = amount.percent_floor(70) + amount.percent_floor(30);
        assert_eq!((amount - kept).rupiah(), 1);
    }
}
