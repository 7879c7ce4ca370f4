//! # OmniLink Ledger
//!
//! Commission ledger services for the affiliate marketplace.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Ledger Services                                 │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  SaleService   │  │ LedgerService  │  │  CatalogService            ││
//! │  │                │  │                │  │                            ││
//! │  │ • record_sale  │  │ • affiliate_   │  │ • create_business/affiliate││
//! │  │                │  │   ledger       │  │ • create/list/deactivate   ││
//! │  │                │  │ • business_    │  │   products                 ││
//! │  │                │  │   ledger(_for) │  │ • select_product           ││
//! │  │                │  │ • dashboard    │  │ • track_click              ││
//! │  └───────┬────────┘  └───────┬────────┘  └─────────────┬──────────────┘│
//! │          └───────────────────┼─────────────────────────┘               │
//! │                              ▼                                          │
//! │                  omnilink_db::Database (SqlitePool)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `DATABASE_PATH` - SQLite file (default: ./omnilink.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `PLATFORM_FEE_PERCENT` - Fee on every sale (default: 2.0)
//! - `DEFAULT_CURRENCY` - Currency when a sale omits one (default: USD)
//!
//! ## Usage
//! ```rust,ignore
//! let app = LedgerApp::new(LedgerConfig::load()?).await?;
//! let receipt = app.record_sale(RecordSale::new(product_id).quantity(3)).await?;
//! ```

pub mod config;
pub mod error;
pub mod services;

use tracing::info;

use omnilink_core::{AffiliateLedger, ProductLedger, RecordSale, SaleReceipt};
use omnilink_db::Database;

// Re-exports
pub use config::{ConfigError, LedgerConfig};
pub use error::{ErrorBody, ErrorCode, ServiceError, ServiceResult};
pub use services::{CatalogService, LedgerService, SaleService};

/// Shared application state: one database pool, one set of services.
#[derive(Debug, Clone)]
pub struct LedgerApp {
    db: Database,
    config: LedgerConfig,
    sales: SaleService,
    ledger: LedgerService,
    catalog: CatalogService,
}

impl LedgerApp {
    /// Opens (and migrates) the configured database and builds the services.
    pub async fn new(config: LedgerConfig) -> ServiceResult<Self> {
        let config = config.validated()?;
        let db = Database::new(config.db_config()).await?;
        Self::with_database(db, config)
    }

    /// Builds the services over an already open database.
    pub fn with_database(db: Database, config: LedgerConfig) -> ServiceResult<Self> {
        let calculator = config.calculator()?;

        info!(
            platform_fee_percent = %calculator.platform_fee_percent(),
            default_currency = %config.default_currency,
            "Ledger services ready"
        );

        Ok(LedgerApp {
            sales: SaleService::new(db.clone(), calculator, config.default_currency.clone()),
            ledger: LedgerService::new(db.clone()),
            catalog: CatalogService::new(db.clone()),
            db,
            config,
        })
    }

    /// Records a sale. See [`SaleService::record_sale`].
    pub async fn record_sale(&self, request: RecordSale) -> ServiceResult<SaleReceipt> {
        self.sales.record_sale(request).await
    }

    /// Totals of one affiliate. See [`LedgerService::affiliate_ledger`].
    pub async fn affiliate_ledger(&self, affiliate_id: &str) -> ServiceResult<AffiliateLedger> {
        self.ledger.affiliate_ledger(affiliate_id).await
    }

    /// Per-product totals. See [`LedgerService::business_ledger`].
    pub async fn business_ledger(&self, product_ids: &[String]) -> ServiceResult<Vec<ProductLedger>> {
        self.ledger.business_ledger(product_ids).await
    }

    pub fn sales(&self) -> &SaleService {
        &self.sales
    }

    pub fn ledger(&self) -> &LedgerService {
        &self.ledger
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Closes the connection pool.
    pub async fn close(&self) {
        self.db.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let app = LedgerApp::new(LedgerConfig::for_testing()).await.unwrap();
        let catalog = app.catalog();

        let business = catalog.create_business("Acme", None).await.unwrap();
        let affiliate = catalog.create_affiliate("Pat").await.unwrap();
        let product = catalog
            .create_product(services::fixtures::new_product(&business.id, 1999, dec!(10)))
            .await
            .unwrap();
        catalog.select_product(&affiliate.id, &product.id).await.unwrap();

        let receipt = app
            .record_sale(RecordSale::new(&product.id).quantity(3).affiliate(&affiliate.id))
            .await
            .unwrap();
        assert_eq!(receipt.gross.to_string(), "59.97");

        let ledger = app.affiliate_ledger(&affiliate.id).await.unwrap();
        assert_eq!(ledger.sales_count, 1);
        assert_eq!(ledger.commissions_earned.to_string(), "6.00");

        let rows = app.business_ledger(&[product.id.clone()]).await.unwrap();
        assert_eq!(rows[0].affiliate.to_string(), "6.00");
        assert_eq!(rows[0].platform.to_string(), "1.20");
        assert_eq!(rows[0].business.to_string(), "52.77");
    }

    #[tokio::test]
    async fn test_platform_fee_comes_from_config() {
        let config = LedgerConfig::for_testing().with_platform_fee_percent(dec!(10));
        let app = LedgerApp::new(config).await.unwrap();

        let business = app.catalog().create_business("Acme", None).await.unwrap();
        let product = app
            .catalog()
            .create_product(services::fixtures::new_product(&business.id, 1000, dec!(0)))
            .await
            .unwrap();

        let receipt = app.record_sale(RecordSale::new(&product.id)).await.unwrap();
        assert_eq!(receipt.platform_fee.to_string(), "1.00");
        assert_eq!(receipt.business_revenue.to_string(), "9.00");
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let config = LedgerConfig::for_testing().with_platform_fee_percent(dec!(101));
        let err = LedgerApp::new(config).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ConfigError);
    }

    #[tokio::test]
    async fn test_file_database_persists_sales() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::for_testing().with_database_path(dir.path().join("ledger.db"));

        let app = LedgerApp::new(config.clone()).await.unwrap();
        let business = app.catalog().create_business("Acme", None).await.unwrap();
        let product = app
            .catalog()
            .create_product(services::fixtures::new_product(&business.id, 500, dec!(0)))
            .await
            .unwrap();
        app.record_sale(RecordSale::new(&product.id)).await.unwrap();
        app.close().await;

        let reopened = LedgerApp::new(config).await.unwrap();
        let rows = reopened.business_ledger(&[product.id]).await.unwrap();
        assert_eq!(rows[0].sales_count, 1);
    }
}
