//! # Catalog Service
//!
//! Profiles, products, affiliate selections and click tracking: the data the
//! sale recorder and the ledger read from.
//!
//! ## Attribution Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Business ── create_product ──► Product (active)                       │
//! │                                      │                                  │
//! │  Affiliate ── select_product ────────┤  Selected / AlreadySelected     │
//! │                                      │                                  │
//! │  Visitor ──── track_click ───────────┴──► ClickRedirect                │
//! │                                            { click_id, sales page }     │
//! │                                                                         │
//! │  The affiliate id carried through the link reaches record_sale later.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ServiceResult;
use omnilink_core::validation::{
    validate_commission_percent, validate_id, validate_name, validate_price, validate_url,
};
use omnilink_core::{
    AffiliateProfile, AffiliateSelection, BusinessProfile, Click, ClickRedirect, CoreError,
    NewProduct, Product, SelectionOutcome,
};
use omnilink_db::Database;

/// Catalog and attribution service.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    // =========================================================================
    // Profiles
    // =========================================================================

    pub async fn create_business(
        &self,
        display_name: &str,
        website_url: Option<String>,
    ) -> ServiceResult<BusinessProfile> {
        validate_name("display_name", display_name)?;
        if let Some(url) = website_url.as_deref() {
            validate_url("website_url", url)?;
        }

        let business = BusinessProfile {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.trim().to_string(),
            website_url,
            created_at: Utc::now(),
        };
        self.db.businesses().insert(&business).await?;

        info!(business_id = %business.id, "Business created");
        Ok(business)
    }

    pub async fn create_affiliate(&self, display_name: &str) -> ServiceResult<AffiliateProfile> {
        validate_name("display_name", display_name)?;

        let affiliate = AffiliateProfile {
            id: Uuid::new_v4().to_string(),
            display_name: display_name.trim().to_string(),
            created_at: Utc::now(),
        };
        self.db.affiliates().insert(&affiliate).await?;

        info!(affiliate_id = %affiliate.id, "Affiliate created");
        Ok(affiliate)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Lists a new product for a business.
    ///
    /// ## Errors
    /// - `Validation` - name, price, URL or commission percent rejected
    /// - `BusinessNotFound` - no such business
    pub async fn create_product(&self, new: NewProduct) -> ServiceResult<Product> {
        validate_id("business_id", &new.business_id)?;
        validate_name("name", &new.name)?;
        validate_price(new.price)?;
        validate_url("sales_page_url", &new.sales_page_url)?;
        if let Some(url) = new.image_url.as_deref() {
            validate_url("image_url", url)?;
        }
        validate_commission_percent(new.affiliate_commission_percent)?;

        if self.db.businesses().get_by_id(&new.business_id).await?.is_none() {
            return Err(CoreError::BusinessNotFound(new.business_id).into());
        }

        let now = Utc::now();
        let product = Product {
            id: Uuid::new_v4().to_string(),
            business_id: new.business_id,
            name: new.name.trim().to_string(),
            description: new.description,
            price: new.price,
            sales_page_url: new.sales_page_url.trim().to_string(),
            affiliate_commission_percent: new.affiliate_commission_percent.normalize(),
            image_url: new.image_url,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.db.products().insert(&product).await?;

        info!(
            product_id = %product.id,
            business_id = %product.business_id,
            price = %product.price,
            commission_percent = %product.affiliate_commission_percent,
            "Product created"
        );
        Ok(product)
    }

    /// Active products, newest first.
    pub async fn list_marketplace(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_active().await?)
    }

    /// All products of a business, newest first.
    pub async fn list_business_products(&self, business_id: &str) -> ServiceResult<Vec<Product>> {
        Ok(self.db.products().list_by_business(business_id).await?)
    }

    /// Takes a product off the marketplace. Its sales stay in the ledger.
    pub async fn deactivate_product(&self, product_id: &str) -> ServiceResult<()> {
        self.db.products().deactivate(product_id).await?;
        info!(product_id = %product_id, "Product deactivated");
        Ok(())
    }

    // =========================================================================
    // Attribution
    // =========================================================================

    /// Adds a product to an affiliate's promoted list.
    pub async fn select_product(
        &self,
        affiliate_id: &str,
        product_id: &str,
    ) -> ServiceResult<SelectionOutcome> {
        if !self.db.affiliates().exists(affiliate_id).await? {
            return Err(CoreError::AffiliateNotFound(affiliate_id.to_string()).into());
        }
        self.active_product(product_id).await?;

        let selection = AffiliateSelection {
            id: Uuid::new_v4().to_string(),
            affiliate_id: affiliate_id.to_string(),
            product_id: product_id.to_string(),
            created_at: Utc::now(),
        };
        let outcome = self.db.selections().insert(&selection).await?;

        debug!(affiliate_id = %affiliate_id, product_id = %product_id, ?outcome, "select_product");
        Ok(outcome)
    }

    /// Products an affiliate promotes, most recent selection first.
    pub async fn list_selections(&self, affiliate_id: &str) -> ServiceResult<Vec<Product>> {
        Ok(self
            .db
            .selections()
            .list_products_for_affiliate(affiliate_id)
            .await?)
    }

    /// Logs a visit through an affiliate link and returns where to send it.
    ///
    /// An unknown affiliate id is dropped and the click kept unattributed.
    pub async fn track_click(
        &self,
        product_id: &str,
        affiliate_id: Option<&str>,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> ServiceResult<ClickRedirect> {
        let product = self.active_product(product_id).await?;

        let affiliate_id = match affiliate_id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                if self.db.affiliates().exists(id).await? {
                    Some(id.to_string())
                } else {
                    warn!(affiliate_id = %id, "Unknown affiliate, tracking click as unattributed");
                    None
                }
            }
            None => None,
        };

        let click = Click {
            id: Uuid::new_v4().to_string(),
            product_id: product.id,
            affiliate_id,
            ip_address,
            user_agent,
            created_at: Utc::now(),
        };
        self.db.clicks().insert(&click).await?;

        debug!(click_id = %click.id, product_id = %click.product_id, "Click tracked");
        Ok(ClickRedirect {
            click_id: click.id,
            redirect_url: product.sales_page_url,
        })
    }

    async fn active_product(&self, product_id: &str) -> ServiceResult<Product> {
        let product = self
            .db
            .products()
            .get_by_id(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures;
    use omnilink_core::Money;
    use rust_decimal_macros::dec;

    async fn catalog() -> CatalogService {
        CatalogService::new(fixtures::database().await)
    }

    #[tokio::test]
    async fn test_create_product() {
        let catalog = catalog().await;
        let business = fixtures::business(&catalog).await;

        let product = fixtures::product(&catalog, &business.id, 1999, dec!(12.50)).await;
        assert!(product.is_active);
        assert_eq!(product.affiliate_commission_percent, dec!(12.5));

        let marketplace = catalog.list_marketplace().await.unwrap();
        assert_eq!(marketplace, vec![product]);
    }

    #[tokio::test]
    async fn test_create_product_validation() {
        let catalog = catalog().await;
        let business = fixtures::business(&catalog).await;
        let valid = fixtures::new_product(&business.id, 1999, dec!(10));

        let invalid = [
            NewProduct {
                affiliate_commission_percent: dec!(100.01),
                ..valid.clone()
            },
            NewProduct {
                affiliate_commission_percent: dec!(-1),
                ..valid.clone()
            },
            NewProduct {
                price: Money::zero(),
                ..valid.clone()
            },
            NewProduct {
                name: "   ".to_string(),
                ..valid.clone()
            },
            NewProduct {
                sales_page_url: "ftp://acme.example".to_string(),
                ..valid.clone()
            },
        ];
        for new in invalid {
            let err = catalog.create_product(new).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }

        let err = catalog
            .create_product(NewProduct {
                business_id: "ghost".to_string(),
                ..valid
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        assert!(catalog.list_marketplace().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_boundary_percents_accepted() {
        let catalog = catalog().await;
        let business = fixtures::business(&catalog).await;

        fixtures::product(&catalog, &business.id, 100, dec!(0)).await;
        fixtures::product(&catalog, &business.id, 100, dec!(100)).await;

        let listed = catalog.list_business_products(&business.id).await.unwrap();
        assert_eq!(listed.len(), 2);
    }

    #[tokio::test]
    async fn test_select_product() {
        let catalog = catalog().await;
        let business = fixtures::business(&catalog).await;
        let affiliate = fixtures::affiliate(&catalog).await;
        let product = fixtures::product(&catalog, &business.id, 1999, dec!(10)).await;

        let first = catalog.select_product(&affiliate.id, &product.id).await.unwrap();
        let again = catalog.select_product(&affiliate.id, &product.id).await.unwrap();
        assert_eq!(first, SelectionOutcome::Selected);
        assert_eq!(again, SelectionOutcome::AlreadySelected);

        let selections = catalog.list_selections(&affiliate.id).await.unwrap();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].id, product.id);

        let err = catalog.select_product("ghost", &product.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        catalog.deactivate_product(&product.id).await.unwrap();
        let other = fixtures::affiliate(&catalog).await;
        let err = catalog.select_product(&other.id, &product.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_track_click() {
        let catalog = catalog().await;
        let business = fixtures::business(&catalog).await;
        let affiliate = fixtures::affiliate(&catalog).await;
        let product = fixtures::product(&catalog, &business.id, 1999, dec!(10)).await;

        let redirect = catalog
            .track_click(
                &product.id,
                Some(&affiliate.id),
                Some("203.0.113.7".to_string()),
                None,
            )
            .await
            .unwrap();
        assert_eq!(redirect.redirect_url, product.sales_page_url);

        // Unknown affiliate still redirects
        catalog
            .track_click(&product.id, Some("ghost"), None, None)
            .await
            .unwrap();

        assert_eq!(catalog.db.clicks().count_for_product(&product.id).await.unwrap(), 2);

        catalog.deactivate_product(&product.id).await.unwrap();
        let err = catalog
            .track_click(&product.id, None, None, None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_product() {
        let catalog = catalog().await;
        let err = catalog.deactivate_product("ghost").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
