//! # Domain Types
//!
//! Core domain types used throughout the ledger.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ BusinessProfile │──►│    Product      │◄──│AffiliateProfile │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  price          │   │  id             │       │
//! │  │  display_name   │   │  commission %   │   │  display_name   │       │
//! │  └─────────────────┘   │  is_active      │   └────────┬────────┘       │
//! │                        └────────┬────────┘            │                │
//! │                                 │                     │ optional       │
//! │                        ┌────────▼────────┐            │                │
//! │                        │      Sale       │◄───────────┘                │
//! │                        │  (immutable)    │                             │
//! │                        │  gross = fee +  │                             │
//! │                        │  comm + revenue │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Identifiers are UUID v4 strings, generated by the layer that creates the
//! record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commission::CommissionSplit;
use crate::error::CoreResult;
use crate::money::Money;
use crate::percent::Percent;

// =============================================================================
// Profiles
// =============================================================================

/// A business that lists products on the marketplace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProfile {
    pub id: String,
    pub display_name: String,
    pub website_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An affiliate that promotes products for commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateProfile {
    pub id: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Product
// =============================================================================

/// A product listed by a business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,

    /// Owning business.
    pub business_id: String,

    pub name: String,
    pub description: Option<String>,

    /// Current list price. Sales snapshot it at recording time.
    pub price: Money,

    /// Where tracked clicks are redirected.
    pub sales_page_url: String,

    /// Share of gross paid to the attributing affiliate, `0..=100`.
    ///
    /// Kept raw: it was validated when the catalog was written, and
    /// [`Product::commission_percent`] re-checks it whenever money is
    /// computed from it.
    pub affiliate_commission_percent: Decimal,

    pub image_url: Option<String>,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The commission rate as a validated [`Percent`].
    ///
    /// ## Errors
    /// [`crate::CoreError::DataIntegrity`] if the stored value is outside
    /// `[0, 100]`.
    pub fn commission_percent(&self) -> CoreResult<Percent> {
        Percent::for_field("affiliate_commission_percent", self.affiliate_commission_percent)
    }
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProduct {
    pub business_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub sales_page_url: String,
    pub affiliate_commission_percent: Decimal,
    pub image_url: Option<String>,
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable ledger entry.
///
/// Created exactly once when a sale is recorded and never updated or
/// deleted afterwards. `gross == platform_fee + affiliate_commission +
/// business_revenue` holds for every stored row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    pub product_id: String,

    /// `None` for an unattributed sale.
    pub affiliate_id: Option<String>,

    pub quantity: i64,

    /// Unit price at time of sale (frozen).
    pub unit_price: Money,

    pub currency: String,
    pub gross: Money,
    pub affiliate_commission: Money,
    pub platform_fee: Money,
    pub business_revenue: Money,

    /// Caller's order reference. Stored, not deduplicated.
    pub external_order_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// The four derived amounts of this sale.
    pub fn split(&self) -> CommissionSplit {
        CommissionSplit {
            gross: self.gross,
            affiliate_commission: self.affiliate_commission,
            platform_fee: self.platform_fee,
            business_revenue: self.business_revenue,
        }
    }

    /// Whether an affiliate is credited for this sale.
    pub fn is_attributed(&self) -> bool {
        self.affiliate_id.is_some()
    }
}

/// A request to record a sale.
///
/// ## Example
/// ```rust
/// use omnilink_core::{Money, RecordSale};
///
/// let request = RecordSale::new("product-id")
///     .quantity(3)
///     .unit_price(Money::from_cents(1999))
///     .affiliate("affiliate-id");
/// assert_eq!(request.quantity, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSale {
    pub product_id: String,

    #[serde(default = "default_quantity")]
    pub quantity: i64,

    /// Overrides the product's current price when present.
    #[serde(default)]
    pub unit_price: Option<Money>,

    /// Falls back to the configured default currency when absent.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(default)]
    pub affiliate_id: Option<String>,

    #[serde(default)]
    pub external_order_id: Option<String>,
}

fn default_quantity() -> i64 {
    1
}

impl RecordSale {
    /// A single-unit sale at the product's current price.
    pub fn new(product_id: impl Into<String>) -> Self {
        RecordSale {
            product_id: product_id.into(),
            quantity: default_quantity(),
            unit_price: None,
            currency: None,
            affiliate_id: None,
            external_order_id: None,
        }
    }

    pub fn quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn unit_price(mut self, unit_price: Money) -> Self {
        self.unit_price = Some(unit_price);
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn affiliate(mut self, affiliate_id: impl Into<String>) -> Self {
        self.affiliate_id = Some(affiliate_id.into());
        self
    }

    pub fn external_order(mut self, external_order_id: impl Into<String>) -> Self {
        self.external_order_id = Some(external_order_id.into());
        self
    }
}

/// What the caller gets back after recording a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub sale_id: String,
    pub gross: Money,
    pub affiliate_commission: Money,
    pub platform_fee: Money,
    pub business_revenue: Money,
}

impl From<&Sale> for SaleReceipt {
    fn from(sale: &Sale) -> Self {
        SaleReceipt {
            sale_id: sale.id.clone(),
            gross: sale.gross,
            affiliate_commission: sale.affiliate_commission,
            platform_fee: sale.platform_fee,
            business_revenue: sale.business_revenue,
        }
    }
}

// =============================================================================
// Ledger Views
// =============================================================================

/// Totals credited to one affiliate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateLedger {
    pub affiliate_id: String,
    pub sales_count: i64,
    pub gross_amount: Money,
    pub commissions_earned: Money,
}

impl AffiliateLedger {
    /// Ledger of an affiliate with no sales.
    pub fn empty(affiliate_id: impl Into<String>) -> Self {
        AffiliateLedger {
            affiliate_id: affiliate_id.into(),
            sales_count: 0,
            gross_amount: Money::zero(),
            commissions_earned: Money::zero(),
        }
    }
}

/// Affiliate ledger plus how many products the affiliate promotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateDashboard {
    pub selected_products: i64,
    #[serde(flatten)]
    pub ledger: AffiliateLedger,
}

/// Totals of one product across all of its sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductLedger {
    pub product_id: String,
    pub sales_count: i64,
    pub gross: Money,
    pub affiliate: Money,
    pub platform: Money,
    pub business: Money,
}

impl ProductLedger {
    /// Row for a product with no sales.
    pub fn empty(product_id: impl Into<String>) -> Self {
        ProductLedger {
            product_id: product_id.into(),
            sales_count: 0,
            gross: Money::zero(),
            affiliate: Money::zero(),
            platform: Money::zero(),
            business: Money::zero(),
        }
    }
}

/// A business's product ledger row, labelled with the product name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessProductLedger {
    pub name: String,
    #[serde(flatten)]
    pub ledger: ProductLedger,
}

// =============================================================================
// Attribution
// =============================================================================

/// Records that an affiliate opted into promoting a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateSelection {
    pub id: String,
    pub affiliate_id: String,
    pub product_id: String,
    pub created_at: DateTime<Utc>,
}

/// Result of selecting a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionOutcome {
    Selected,
    AlreadySelected,
}

/// A tracked visit through an affiliate link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Click {
    pub id: String,
    pub product_id: String,
    pub affiliate_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Where a tracked click should be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickRedirect {
    pub click_id: String,
    pub redirect_url: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
