//! # Percent Module
//!
//! A percentage known to lie in `[0, 100]`.
//!
//! Commission and platform-fee rates are validated where they are written
//! (catalog, configuration). The ledger still refuses to compute with a rate
//! outside the range: that can only mean an upstream check was bypassed, so
//! it surfaces as [`CoreError::DataIntegrity`] instead of being clamped.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult, ValidationError};

/// A decimal percentage in `[0, 100]` inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Percent(Decimal);

impl Percent {
    /// Validates a raw percentage.
    ///
    /// ## Example
    /// ```rust
    /// use omnilink_core::Percent;
    /// use rust_decimal::Decimal;
    ///
    /// assert!(Percent::new(Decimal::new(125, 1)).is_ok()); // 12.5%
    /// assert!(Percent::new(Decimal::new(101, 0)).is_err());
    /// assert!(Percent::new(Decimal::new(-1, 0)).is_err());
    /// ```
    pub fn new(value: Decimal) -> CoreResult<Self> {
        Self::for_field("percent", value)
    }

    /// Same as [`Percent::new`], naming the offending field in the error.
    pub fn for_field(field: &str, value: Decimal) -> CoreResult<Self> {
        if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
            return Err(CoreError::DataIntegrity {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        Ok(Percent(value))
    }

    /// Whole-number percentage (e.g. `10` for 10%).
    pub fn from_whole(pct: u32) -> CoreResult<Self> {
        Self::new(Decimal::from(pct))
    }

    /// Zero percent.
    #[inline]
    pub const fn zero() -> Self {
        Percent(Decimal::ZERO)
    }

    /// Returns the raw percentage (`10` means 10%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Percent {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidFormat {
            field: "percent".to_string(),
            reason: format!("'{s}' is not a decimal number"),
        })?;
        Percent::new(value)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <Decimal as Deserialize>::deserialize(deserializer)?;
        Percent::new(raw).map_err(serde::de::Error::custom)
    }
}
