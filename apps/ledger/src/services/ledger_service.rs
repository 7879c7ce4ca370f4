//! # Ledger Service
//!
//! Read-only views over recorded sales.
//!
//! All figures are sums of the amounts frozen on each sale, so a product
//! price or commission change never rewrites history.

use tracing::debug;

use crate::error::ServiceResult;
use omnilink_core::{
    AffiliateDashboard, AffiliateLedger, BusinessProductLedger, CoreError, ProductLedger,
};
use omnilink_db::Database;

/// Ledger aggregation service.
#[derive(Debug, Clone)]
pub struct LedgerService {
    db: Database,
}

impl LedgerService {
    /// Create a new ledger service.
    pub fn new(db: Database) -> Self {
        LedgerService { db }
    }

    /// Sales count, gross and commissions of one affiliate.
    ///
    /// An affiliate without sales gets zeros, not an error.
    pub async fn affiliate_ledger(&self, affiliate_id: &str) -> ServiceResult<AffiliateLedger> {
        debug!(affiliate_id = %affiliate_id, "affiliate_ledger");
        Ok(self.db.ledger().affiliate_totals(affiliate_id).await?)
    }

    /// One row per requested product, in request order.
    pub async fn business_ledger(&self, product_ids: &[String]) -> ServiceResult<Vec<ProductLedger>> {
        debug!(count = product_ids.len(), "business_ledger");
        Ok(self.db.ledger().product_totals(product_ids).await?)
    }

    /// Named ledger rows for every product of a business, newest product first.
    pub async fn business_ledger_for(
        &self,
        business_id: &str,
    ) -> ServiceResult<Vec<BusinessProductLedger>> {
        if self.db.businesses().get_by_id(business_id).await?.is_none() {
            return Err(CoreError::BusinessNotFound(business_id.to_string()).into());
        }

        let products = self.db.products().list_by_business(business_id).await?;
        let product_ids: Vec<String> = products.iter().map(|p| p.id.clone()).collect();
        let rows = self.business_ledger(&product_ids).await?;

        // Rows come back in request order, one per id
        Ok(products
            .into_iter()
            .zip(rows)
            .map(|(product, ledger)| BusinessProductLedger {
                name: product.name,
                ledger,
            })
            .collect())
    }

    /// The affiliate ledger plus how many products the affiliate promotes.
    pub async fn affiliate_dashboard(&self, affiliate_id: &str) -> ServiceResult<AffiliateDashboard> {
        let ledger = self.affiliate_ledger(affiliate_id).await?;
        let selected_products = self.db.selections().count_for_affiliate(affiliate_id).await?;

        Ok(AffiliateDashboard {
            selected_products,
            ledger,
        })
    }
}
