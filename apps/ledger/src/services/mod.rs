//! Service implementations.
//!
//! Each service owns a cheap [`Database`](omnilink_db::Database) clone and
//! holds no other mutable state, so one instance serves any number of
//! concurrent calls.

pub mod catalog_service;
pub mod ledger_service;
pub mod sale_service;

pub use catalog_service::CatalogService;
pub use ledger_service::LedgerService;
pub use sale_service::SaleService;

/// Seed helpers shared by the service tests.
#[cfg(test)]
pub(crate) mod fixtures {
    use rust_decimal::Decimal;

    use omnilink_core::{AffiliateProfile, BusinessProfile, Money, NewProduct, Product};
    use omnilink_db::{Database, DbConfig};

    use super::CatalogService;

    pub async fn database() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub async fn business(catalog: &CatalogService) -> BusinessProfile {
        catalog
            .create_business("Acme Courses", Some("https://acme.example".to_string()))
            .await
            .unwrap()
    }

    pub async fn affiliate(catalog: &CatalogService) -> AffiliateProfile {
        catalog.create_affiliate("Promo Pat").await.unwrap()
    }

    pub fn new_product(business_id: &str, price_cents: i64, percent: Decimal) -> NewProduct {
        NewProduct {
            business_id: business_id.to_string(),
            name: "Rust Course".to_string(),
            description: Some("Learn ownership".to_string()),
            price: Money::from_cents(price_cents),
            sales_page_url: "https://acme.example/rust".to_string(),
            affiliate_commission_percent: percent,
            image_url: None,
        }
    }

    pub async fn product(
        catalog: &CatalogService,
        business_id: &str,
        price_cents: i64,
        percent: Decimal,
    ) -> Product {
        catalog
            .create_product(new_product(business_id, price_cents, percent))
            .await
            .unwrap()
    }
}
