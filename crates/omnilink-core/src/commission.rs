//! # Commission Split Calculator
//!
//! Turns one sale into four amounts that always add up.
//!
//! ## The Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  gross            = unit_price × quantity          (exact, in cents)    │
//! │  platform_fee     = round(gross × platform_fee% / 100)                  │
//! │  affiliate_comm   = round(gross × affiliate%    / 100)                  │
//! │  business_revenue = gross − platform_fee − affiliate_comm   (residual)  │
//! │                                                                         │
//! │  19.99 × 3 @ 10%, fee 2%                                               │
//! │    gross 59.97 → fee 1.20, affiliate 6.00, business 52.77              │
//! │    1.20 + 6.00 + 52.77 = 59.97 ✓                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each percentage component is rounded on its own (half away from zero,
//! see [`Money::percent_of`]). Business revenue is the residual, so it may
//! differ by a cent from `gross × business%` but the four fields always sum
//! exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::percent::Percent;

/// The four amounts captured on every sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionSplit {
    pub gross: Money,
    pub affiliate_commission: Money,
    pub platform_fee: Money,
    pub business_revenue: Money,
}

impl CommissionSplit {
    /// `platform_fee + affiliate_commission + business_revenue == gross`.
    pub fn is_balanced(&self) -> bool {
        self.platform_fee + self.affiliate_commission + self.business_revenue == self.gross
    }
}

/// Computes commission splits for a fixed platform fee.
///
/// The platform fee is process-wide configuration read once at startup and
/// injected here, so tests can build calculators with any fee they like.
///
/// ## Example
/// ```rust
/// use omnilink_core::{CommissionCalculator, Money, Percent};
///
/// let calc = CommissionCalculator::with_fee(Percent::from_whole(2).unwrap());
/// let split = calc.split(Money::from_cents(1000), 1, Percent::zero()).unwrap();
/// assert_eq!(split.platform_fee.to_string(), "0.20");
/// assert_eq!(split.business_revenue.to_string(), "9.80");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommissionCalculator {
    platform_fee: Percent,
}

impl CommissionCalculator {
    /// Builds a calculator from a raw platform fee percentage.
    ///
    /// Fails with [`CoreError::DataIntegrity`] outside `[0, 100]`.
    pub fn new(platform_fee_percent: Decimal) -> CoreResult<Self> {
        let platform_fee = Percent::for_field("platform_fee_percent", platform_fee_percent)?;
        Ok(Self::with_fee(platform_fee))
    }

    /// Builds a calculator from an already validated fee.
    pub const fn with_fee(platform_fee: Percent) -> Self {
        CommissionCalculator { platform_fee }
    }

    /// The platform fee this calculator applies.
    pub const fn platform_fee_percent(&self) -> Percent {
        self.platform_fee
    }

    /// Splits a sale.
    ///
    /// ## Errors
    /// - `unit_price <= 0` or `quantity < 1` → [`CoreError::Validation`]
    /// - `gross` not representable → [`CoreError::AmountOverflow`]
    /// - fee and commission rates summing past 100% →
    ///   [`CoreError::DataIntegrity`]
    ///
    /// When the rates sum to at most 100% but the rounded fee and commission
    /// together exceed gross by a cent, the commission is trimmed so business
    /// revenue lands on zero.
    pub fn split(
        &self,
        unit_price: Money,
        quantity: i64,
        affiliate_percent: Percent,
    ) -> CoreResult<CommissionSplit> {
        if !unit_price.is_positive() {
            return Err(ValidationError::MustBePositive {
                field: "unit_price".to_string(),
            }
            .into());
        }
        if quantity < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        if affiliate_percent.value() + self.platform_fee.value() > Decimal::ONE_HUNDRED {
            return Err(CoreError::DataIntegrity {
                field: "affiliate_commission_percent + platform_fee_percent".to_string(),
                value: format!("{} + {}", affiliate_percent, self.platform_fee),
            });
        }

        let gross = unit_price.checked_mul_quantity(quantity)?;
        let platform_fee = gross.percent_of(self.platform_fee)?;
        let mut affiliate_commission = gross.percent_of(affiliate_percent)?;

        // Both components rounding up can overshoot gross by a cent when the
        // rates sum to 100; the affiliate absorbs it.
        if platform_fee + affiliate_commission > gross {
            affiliate_commission = gross - platform_fee;
        }
        let business_revenue = gross - platform_fee - affiliate_commission;

        Ok(CommissionSplit {
            gross,
            affiliate_commission,
            platform_fee,
            business_revenue,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
