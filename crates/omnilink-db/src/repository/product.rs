//! # Product Repository
//!
//! Database operations for the marketplace catalog.
//!
//! ## Key Operations
//! - Insert and lookup by ID
//! - Marketplace listing (active products, newest first)
//! - Per-business listing
//! - Soft delete
//!
//! ## Commission Percent Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Decimal("12.5") ──► TEXT '12.5' ──► Decimal("12.5")                    │
//! │                                                                         │
//! │  Stored as decimal text, never REAL, so the value read back is the     │
//! │  exact value written. A row whose text does not parse is reported as   │
//! │  DbError::CorruptRow; range checks happen when money is computed.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::debug;

use crate::error::{DbError, DbResult};
use omnilink_core::{Money, Product};

/// Column list shared by every product SELECT.
const PRODUCT_COLUMNS: &str = r#"
    id, business_id, name, description, price_cents, sales_page_url,
    affiliate_commission_percent, image_url, is_active, created_at, updated_at
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let marketplace = repo.list_active().await?;
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProductRow {
    id: String,
    business_id: String,
    name: String,
    description: Option<String>,
    price_cents: i64,
    sales_page_url: String,
    affiliate_commission_percent: String,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let percent = Decimal::from_str(row.affiliate_commission_percent.trim()).map_err(|e| {
            DbError::corrupt(
                "Product",
                &row.id,
                format!(
                    "affiliate_commission_percent '{}': {}",
                    row.affiliate_commission_percent, e
                ),
            )
        })?;

        Ok(Product {
            id: row.id,
            business_id: row.business_id,
            name: row.name,
            description: row.description,
            price: Money::from_cents(row.price_cents),
            sales_page_url: row.sales_page_url,
            affiliate_commission_percent: percent,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub(crate) fn into_products(rows: Vec<ProductRow>) -> DbResult<Vec<Product>> {
    rows.into_iter().map(Product::try_from).collect()
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by ID, active or not.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let row: Option<ProductRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Product::try_from).transpose()
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - business doesn't exist
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, business_id = %product.business_id, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, business_id, name, description, price_cents, sales_page_url,
                affiliate_commission_percent, image_url, is_active, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9, ?10, ?11
            )
            "#,
        )
        .bind(&product.id)
        .bind(&product.business_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.cents())
        .bind(&product.sales_page_url)
        .bind(product.affiliate_commission_percent.to_string())
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Lists active products, newest first.
    pub async fn list_active(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active = 1 \
             ORDER BY created_at DESC, rowid DESC"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;

        into_products(rows)
    }

    /// Lists every product of a business (including inactive), newest first.
    pub async fn list_by_business(&self, business_id: &str) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE business_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        );

        let rows: Vec<ProductRow> = sqlx::query_as(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await?;

        into_products(rows)
    }

    /// Changes the list price. Recorded sales keep the price they were sold at.
    pub async fn update_price(&self, id: &str, price: Money) -> DbResult<()> {
        debug!(id = %id, price = %price, "Updating product price");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET price_cents = ?2, updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(price.cents())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// Sales keep referencing the product, so rows are never removed.
    pub async fn deactivate(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deactivating product");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET is_active = 0, updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_insert_and_get_preserves_percent() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1999, dec!(12.5)).await;

        let loaded = db.products().get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(loaded, product);
        assert_eq!(loaded.affiliate_commission_percent, dec!(12.5));
        assert_eq!(loaded.price, Money::from_cents(1999));
    }

    #[tokio::test]
    async fn test_insert_for_unknown_business_fails() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let mut product = fixtures::product(&db, &business.id, 500, dec!(5)).await;
        product.id = crate::repository::generate_id();
        product.business_id = "ghost".to_string();

        let err = db.products().insert(&product).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_active_newest_first_and_deactivate() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let first = fixtures::product(&db, &business.id, 100, dec!(5)).await;
        let second = fixtures::product(&db, &business.id, 200, dec!(5)).await;

        let ids: Vec<String> = db
            .products()
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![second.id.clone(), first.id.clone()]);

        db.products().deactivate(&second.id).await.unwrap();

        let active = db.products().list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, first.id);
        assert_eq!(db.products().count_active().await.unwrap(), 1);

        // Still visible to its business, just inactive
        let owned = db.products().list_by_business(&business.id).await.unwrap();
        assert_eq!(owned.len(), 2);
        assert!(!owned[0].is_active);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_is_not_found() {
        let db = fixtures::database().await;
        let err = db.products().deactivate("ghost").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unparsable_percent_is_corrupt_row() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 100, dec!(5)).await;

        sqlx::query("UPDATE products SET affiliate_commission_percent = 'ten' WHERE id = ?1")
            .bind(&product.id)
            .execute(db.pool())
            .await
            .unwrap();

        let err = db.products().get_by_id(&product.id).await.unwrap_err();
        assert!(matches!(err, DbError::CorruptRow { .. }));
    }
}
