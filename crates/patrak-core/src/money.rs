//! # Money Module
//!
//! Provides the `Money` type: an amount of rupees held as integer paise.
//!
//! ## Why Integer Paise?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  Expenses are typed as separate Rupee / Paise fields and summed over   │
//! │  dozens of rows. Summing floats drifts; summing paise does not.        │
//! │                                                                         │
//! │    ₹ 12.30 + ₹ 7.85  →  1230 + 785 = 2015 paise = ₹ 20.15  ✅          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Blank vs. Zero
//! `Money` is always a real value. "Not filled in yet" is `Option<Money>::None`
//! and is rendered as an empty cell; `Money::zero()` is a billed zero.
//!
//! ## Usage
//! ```rust
//! use patrak_core::money::Money;
//!
//! let rent = Money::from_rupees_paise(1250, 50); // ₹ 1250.50
//! let fee = Money::from_paise(4_950);            // ₹ 49.50
//! assert_eq!((rent + fee).paise(), 130_000);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: net balances can be negative
/// - **Sign on the whole amount**: `rupees()` carries the sign, `paise_part()`
///   is always 0-99
/// - **Saturating**: construction and arithmetic clamp at the `i64` bounds,
///   so a runaway total never panics or wraps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from separately entered rupee and paise fields.
    ///
    /// ## Example
    /// ```rust
    /// use patrak_core::money::Money;
    ///
    /// assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
    /// assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
    /// ```
    ///
    /// ## Note
    /// For negative amounts only the rupee field is negative:
    /// `from_rupees_paise(-5, 50)` is -₹5.50, not -₹4.50.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees.saturating_mul(100).saturating_sub(paise))
        } else {
            Money(rupees.saturating_mul(100).saturating_add(paise))
        }
    }

    /// Converts a decimal rupee value, rounding half away from zero at the
    /// hundredths digit.
    ///
    /// Non-finite input becomes zero and out-of-range input clamps to the
    /// `i64` bounds. Rounding happens exactly once here; every later step
    /// works on integer paise.
    ///
    /// ## Example
    /// ```rust
    /// use patrak_core::money::Money;
    ///
    /// assert_eq!(Money::from_f64(1234.5).paise(), 123_450);
    /// assert_eq!(Money::from_f64(0.125).paise(), 13);
    /// assert_eq!(Money::from_f64(f64::NAN).paise(), 0);
    /// ```
    pub fn from_f64(rupees: f64) -> Self {
        if !rupees.is_finite() {
            return Money::zero();
        }
        Money((rupees * 100.0).round() as i64)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee portion (carries the sign).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    ///
    /// ## Example
    /// ```rust
    /// use patrak_core::money::Money;
    ///
    /// assert_eq!(Money::from_paise(-550).paise_part(), 50);
    /// ```
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as decimal rupees (for display arithmetic only).
    #[inline]
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Tax at the full rate, rounded half up to the paisa.
    ///
    /// ## Implementation
    /// Integer math in basis points: `(paise * bps + 5000) / 10000`.
    ///
    /// ## Example
    /// ```rust
    /// use patrak_core::money::Money;
    /// use patrak_core::types::TaxRate;
    ///
    /// let base = Money::from_rupees_paise(1000, 0);
    /// assert_eq!(base.tax_at(TaxRate::from_bps(1800)).paise(), 18_000);
    /// ```
    pub fn tax_at(&self, rate: TaxRate) -> Money {
        Money(round_div(self.0 as i128 * rate.bps() as i128, 10_000))
    }

    /// Tax at half the rate (one CGST or SGST share), rounded half up to the
    /// paisa on its own.
    ///
    /// Computed as `paise * bps / 20000` so odd basis points are not
    /// truncated before rounding.
    pub fn half_tax_at(&self, rate: TaxRate) -> Money {
        Money(round_div(self.0 as i128 * rate.bps() as i128, 20_000))
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i64 {
    let half = denominator / 2;
    let q = if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    };
    i64::try_from(q).unwrap_or(if q < 0 { i64::MIN } else { i64::MAX })
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Latin-digit rendering, used in logs and debugging.
///
/// Invoice display goes through `amount::format_money` instead.
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
