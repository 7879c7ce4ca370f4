//! # omnilink-core: Pure Commission Logic for OmniLink
//!
//! This crate is the **heart** of the commission ledger. It turns a sale
//! into an exact split of money between platform, affiliate and business,
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      OmniLink Ledger Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/ledger (services + CLI)                    │   │
//! │  │      record_sale, affiliate_ledger, business_ledger, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ omnilink-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌────────────┐  ┌────────────┐   │   │
//! │  │   │  money   │  │ percent  │  │ commission │  │ validation │   │   │
//! │  │   │  Money   │  │ Percent  │  │ Calculator │  │   rules    │   │   │
//! │  │   └──────────┘  └──────────┘  └────────────┘  └────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  omnilink-db (Database Layer)                   │   │
//! │  │             SQLite queries, migrations, repositories            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer cents (no floating point!)
//! - [`percent`] - Validated percentage in `[0, 100]`
//! - [`commission`] - The commission split calculator
//! - [`types`] - Domain types (Product, Sale, ledgers, ...)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use omnilink_core::{CommissionCalculator, Money, Percent};
//! use rust_decimal::Decimal;
//!
//! let calculator = CommissionCalculator::new(Decimal::new(20, 1)).unwrap(); // 2.0%
//! let split = calculator
//!     .split(Money::from_cents(1999), 3, Percent::from_whole(10).unwrap())
//!     .unwrap();
//!
//! assert_eq!(split.gross.to_string(), "59.97");
//! assert_eq!(split.platform_fee.to_string(), "1.20");
//! assert_eq!(split.affiliate_commission.to_string(), "6.00");
//! assert_eq!(split.business_revenue.to_string(), "52.77");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod commission;
pub mod error;
pub mod money;
pub mod percent;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use commission::{CommissionCalculator, CommissionSplit};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use percent::Percent;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency recorded when a sale does not name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Platform fee applied when configuration does not override it (2.0%).
pub const DEFAULT_PLATFORM_FEE_PERCENT: &str = "2.0";

/// Maximum length of a currency code as stored in the ledger.
pub const MAX_CURRENCY_LEN: usize = 8;
