//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    59.97 * 0.02 = 1.1994000000000002  ❌ drifts across the ledger        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    5997 cents * 2% = 119.94 cents → rounded once → 120 cents            │
//! │    Every stored amount is an exact integer number of cents             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Money crosses every boundary as a decimal string with exactly two
//! fractional digits (`"59.97"`), never as a JSON number.
//!
//! ## Usage
//! ```rust
//! use omnilink_core::money::Money;
//!
//! let price: Money = "19.99".parse().unwrap();
//! assert_eq!(price.cents(), 1999);
//!
//! let gross = price.checked_mul_quantity(3).unwrap();
//! assert_eq!(gross.to_string(), "59.97");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::percent::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents), scale fixed at 2.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic on residuals can go negative transiently;
///   the commission calculator guarantees persisted fields are non-negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **String serde**: two-digit decimal strings at every boundary
///
/// ## Where Money Flows
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.price ──► Sale.unit_price (snapshot) ──► gross                 │
/// │                                                     │                   │
/// │                          ┌──────────────────────────┼───────────┐       │
/// │                          ▼                          ▼           ▼       │
/// │                    platform_fee       affiliate_commission  business   │
/// │                                                                         │
/// │  Ledger sums are SUM(cents) over the immutable sales table             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use omnilink_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Converts an exact decimal amount into Money.
    ///
    /// ## Rules
    /// - At most two fractional digits (`19.99` ok, `19.999` rejected)
    /// - Trailing zeros are ignored (`10.500` is 10.50)
    ///
    /// ## Example
    /// ```rust
    /// use omnilink_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let m = Money::from_decimal(Decimal::new(1999, 2)).unwrap();
    /// assert_eq!(m.cents(), 1999);
    /// assert!(Money::from_decimal(Decimal::new(19999, 3)).is_err());
    /// ```
    pub fn from_decimal(value: Decimal) -> CoreResult<Self> {
        let normalized = value.normalize();
        if normalized.scale() > 2 {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: format!("{value} has more than two decimal places"),
            }
            .into());
        }

        normalized
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|cents| cents.to_i64())
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Returns the amount as an exact decimal with scale 2.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Multiplies by a quantity, failing instead of wrapping on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use omnilink_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3).unwrap().cents(), 897);
    /// assert!(Money::from_cents(i64::MAX).checked_mul_quantity(2).is_err());
    /// ```
    pub fn checked_mul_quantity(&self, qty: i64) -> CoreResult<Self> {
        self.0
            .checked_mul(qty)
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }

    /// Takes a percentage of this amount, rounded once to whole cents.
    ///
    /// ## Rounding Policy
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF AWAY FROM ZERO, ONCE PER COMPONENT                      │
    /// │                                                                     │
    /// │  exact  = cents × percent / 100      (no intermediate rounding)    │
    /// │  result = round(exact)               (x.5 → x+1 for positives)     │
    /// │                                                                     │
    /// │  5997 × 2 / 100   = 119.94  → 120                                  │
    /// │  1250 × 2 / 100   =  25.00  →  25                                  │
    /// │    25 × 50 / 100  =  12.50  →  13                                  │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use omnilink_core::{Money, Percent};
    ///
    /// let gross = Money::from_cents(5997);
    /// let fee = gross.percent_of(Percent::from_whole(2).unwrap()).unwrap();
    /// assert_eq!(fee.cents(), 120);
    /// ```
    pub fn percent_of(&self, percent: Percent) -> CoreResult<Money> {
        Decimal::from(self.0)
            .checked_mul(percent.value())
            .and_then(|scaled| scaled.checked_div(Decimal::ONE_HUNDRED))
            .map(|exact| exact.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|rounded| rounded.to_i64())
            .map(Money)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering with exactly two fractional digits: `59.97`.
///
/// ## Note
/// No currency symbol. The currency is a separate field on every sale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl FromStr for Money {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{s}' is not a decimal amount"),
        })?;
        Money::from_decimal(value)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Default money is zero.
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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(10, 99).cents(), 1099);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(5997).to_string(), "59.97");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(-50).to_string(), "-0.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse() {
        assert_eq!("19.99".parse::<Money>().unwrap().cents(), 1999);
        assert_eq!("10".parse::<Money>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Money>().unwrap().cents(), 1050);
        assert_eq!(" 10.500 ".parse::<Money>().unwrap().cents(), 1050);
        assert!("19.999".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(Money::from_decimal(dec!(59.97)).unwrap().cents(), 5997);
        assert_eq!(Money::from_cents(5997).to_decimal(), dec!(59.97));
        assert!(matches!(
            Money::from_decimal(dec!(0.001)),
            Err(CoreError::Validation(ValidationError::InvalidFormat { .. }))
        ));
    }

    #[test]
    fn test_serde_uses_two_digit_strings() {
        let json = serde_json::to_string(&Money::from_cents(120)).unwrap();
        assert_eq!(json, "\"1.20\"");

        let back: Money = serde_json::from_str("\"52.77\"").unwrap();
        assert_eq!(back.cents(), 5277);

        // JSON numbers are refused, amounts are strings only
        assert!(serde_json::from_str::<Money>("52.77").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);

        let mut c = a;
        c += b;
        c -= Money::from_cents(250);
        assert_eq!(c.cents(), 1250);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_checked_mul_quantity() {
        assert_eq!(Money::from_cents(1999).checked_mul_quantity(3).unwrap().cents(), 5997);
        assert!(matches!(
            Money::from_cents(i64::MAX / 2 + 1).checked_mul_quantity(2),
            Err(CoreError::AmountOverflow)
        ));
    }

    #[test]
    fn test_percent_of_rounds_half_away_from_zero() {
        let ten_pct = Percent::new(dec!(10)).unwrap();
        let two_pct = Percent::new(dec!(2.0)).unwrap();
        let half = Percent::new(dec!(50)).unwrap();

        assert_eq!(Money::from_cents(5997).percent_of(ten_pct).unwrap().cents(), 600); // 599.7
        assert_eq!(Money::from_cents(5997).percent_of(two_pct).unwrap().cents(), 120); // 119.94
        assert_eq!(Money::from_cents(25).percent_of(half).unwrap().cents(), 13); // 12.5
        assert_eq!(Money::from_cents(1000).percent_of(Percent::zero()).unwrap().cents(), 0);
    }

    #[test]
    fn test_percent_of_fractional_percent() {
        let pct = Percent::new(dec!(12.345)).unwrap();
        // 10000 × 12.345 / 100 = 1234.5 → 1235
        assert_eq!(Money::from_cents(10000).percent_of(pct).unwrap().cents(), 1235);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_cents(-100);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }
}
