//! # Sale Service
//!
//! Records sales into the immutable ledger.
//!
//! ## Recording Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       record_sale(request)                              │
//! │                                                                         │
//! │  1. Validate quantity (>= 1) and currency (upper-cased)                │
//! │  2. Load product ──── missing or inactive ──► ProductNotFound          │
//! │  3. Unit price = request override or the product's current price       │
//! │  4. Affiliate id ──── unknown ──► warn!, sale becomes unattributed     │
//! │  5. CommissionCalculator::split(unit_price, quantity, percent)         │
//! │  6. One INSERT into sales ──► SaleReceipt                              │
//! │                                                                         │
//! │  Any failure before step 6 leaves the ledger untouched.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ServiceResult;
use omnilink_core::validation::{validate_currency, validate_id, validate_quantity};
use omnilink_core::{CommissionCalculator, CoreError, Percent, RecordSale, Sale, SaleReceipt};
use omnilink_db::Database;

/// Sale recording service.
#[derive(Debug, Clone)]
pub struct SaleService {
    db: Database,
    calculator: CommissionCalculator,
    default_currency: String,
}

impl SaleService {
    /// Create a new sale service.
    pub fn new(
        db: Database,
        calculator: CommissionCalculator,
        default_currency: impl Into<String>,
    ) -> Self {
        SaleService {
            db,
            calculator,
            default_currency: default_currency.into(),
        }
    }

    /// Records a sale and returns its split.
    ///
    /// ## Errors
    /// - `Validation` - bad quantity, currency, price override or product id
    /// - `ProductNotFound` - product missing or inactive
    /// - `DataIntegrity` - product commission percent outside `[0, 100]`, or
    ///   commission and platform fee together above 100%
    /// - `Db` - the insert failed; nothing was written
    pub async fn record_sale(&self, request: RecordSale) -> ServiceResult<SaleReceipt> {
        debug!(product_id = %request.product_id, quantity = request.quantity, "record_sale");

        validate_id("product_id", &request.product_id)?;
        validate_quantity(request.quantity)?;
        let currency = validate_currency(
            request
                .currency
                .as_deref()
                .unwrap_or(&self.default_currency),
        )?;

        let product = self
            .db
            .products()
            .get_by_id(&request.product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CoreError::ProductNotFound(request.product_id.clone()))?;

        // Snapshot: later price changes never touch this sale
        let unit_price = request.unit_price.unwrap_or(product.price);

        let affiliate_id = self.resolve_affiliate(request.affiliate_id.as_deref()).await?;

        let product_percent = product.commission_percent()?;
        let percent = if affiliate_id.is_some() {
            product_percent
        } else {
            Percent::zero()
        };

        let split = self.calculator.split(unit_price, request.quantity, percent)?;

        if let Some(order) = request.external_order_id.as_deref() {
            if self.db.sales().exists_external_order(order).await? {
                warn!(external_order_id = %order, "External order already recorded, recording again");
            }
        }

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            product_id: product.id,
            affiliate_id,
            quantity: request.quantity,
            unit_price,
            currency,
            gross: split.gross,
            affiliate_commission: split.affiliate_commission,
            platform_fee: split.platform_fee,
            business_revenue: split.business_revenue,
            external_order_id: request.external_order_id,
            created_at: Utc::now(),
        };

        self.db.sales().insert(&sale).await?;

        info!(
            sale_id = %sale.id,
            product_id = %sale.product_id,
            affiliate_id = sale.affiliate_id.as_deref().unwrap_or("-"),
            gross = %sale.gross,
            commission = %sale.affiliate_commission,
            "Sale recorded"
        );

        Ok(SaleReceipt::from(&sale))
    }

    /// Looks up the sale's affiliate. Unknown ids degrade to `None`.
    async fn resolve_affiliate(&self, affiliate_id: Option<&str>) -> ServiceResult<Option<String>> {
        let Some(id) = affiliate_id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(None);
        };

        if self.db.affiliates().exists(id).await? {
            Ok(Some(id.to_string()))
        } else {
            warn!(affiliate_id = %id, "Unknown affiliate, recording sale as unattributed");
            Ok(None)
        }
    }
}
