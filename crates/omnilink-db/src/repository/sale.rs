//! # Sale Repository
//!
//! The append-only sales ledger.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. SPLIT (omnilink-core)                                              │
//! │     └── CommissionCalculator::split() → CommissionSplit                │
//! │                                                                         │
//! │  2. INSERT (this module)                                               │
//! │     └── insert() → one row, all amounts frozen                         │
//! │                                                                         │
//! │  3. READ                                                               │
//! │     └── get_by_id() / list_for_product() / LedgerRepository sums       │
//! │                                                                         │
//! │  There is no step 4. UPDATE and DELETE are aborted by triggers and     │
//! │  surface as DbError::ImmutableRecord.                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Unit price and every split amount are copied onto the row, so later
//! catalog edits never change what a past sale paid out.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use omnilink_core::{Money, Sale};

const SALE_COLUMNS: &str = r#"
    id, product_id, affiliate_id, quantity, unit_price_cents, currency,
    gross_cents, affiliate_commission_cents, platform_fee_cents,
    business_revenue_cents, external_order_id, created_at
"#;

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    product_id: String,
    affiliate_id: Option<String>,
    quantity: i64,
    unit_price_cents: i64,
    currency: String,
    gross_cents: i64,
    affiliate_commission_cents: i64,
    platform_fee_cents: i64,
    business_revenue_cents: i64,
    external_order_id: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SaleRow> for Sale {
    fn from(row: SaleRow) -> Self {
        Sale {
            id: row.id,
            product_id: row.product_id,
            affiliate_id: row.affiliate_id,
            quantity: row.quantity,
            unit_price: Money::from_cents(row.unit_price_cents),
            currency: row.currency,
            gross: Money::from_cents(row.gross_cents),
            affiliate_commission: Money::from_cents(row.affiliate_commission_cents),
            platform_fee: Money::from_cents(row.platform_fee_cents),
            business_revenue: Money::from_cents(row.business_revenue_cents),
            external_order_id: row.external_order_id,
            created_at: row.created_at,
        }
    }
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Inserts a sale. A single statement, so it lands whole or not at all.
    ///
    /// ## Returns
    /// * `Err(DbError::ConstraintViolation)` - amounts don't sum to gross
    /// * `Err(DbError::ForeignKeyViolation)` - product or affiliate missing
    pub async fn insert(&self, sale: &Sale) -> DbResult<()> {
        debug!(
            id = %sale.id,
            product_id = %sale.product_id,
            gross = %sale.gross,
            "Inserting sale"
        );

        sqlx::query(
            r#"
            INSERT INTO sales (
                id, product_id, affiliate_id, quantity, unit_price_cents, currency,
                gross_cents, affiliate_commission_cents, platform_fee_cents,
                business_revenue_cents, external_order_id, created_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6,
                ?7, ?8, ?9,
                ?10, ?11, ?12
            )
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.product_id)
        .bind(&sale.affiliate_id)
        .bind(sale.quantity)
        .bind(sale.unit_price.cents())
        .bind(&sale.currency)
        .bind(sale.gross.cents())
        .bind(sale.affiliate_commission.cents())
        .bind(sale.platform_fee.cents())
        .bind(sale.business_revenue.cents())
        .bind(&sale.external_order_id)
        .bind(sale.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let row: Option<SaleRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Sale::from))
    }

    /// Sales of a product, newest first.
    pub async fn list_for_product(&self, product_id: &str) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE product_id = ?1 \
             ORDER BY created_at DESC, rowid DESC"
        );

        let rows: Vec<SaleRow> = sqlx::query_as(&sql)
            .bind(product_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Sale::from).collect())
    }

    /// Whether a sale with this external order reference was already recorded.
    pub async fn exists_external_order(&self, external_order_id: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM sales WHERE external_order_id = ?1 LIMIT 1")
                .bind(external_order_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }

    /// Counts all recorded sales (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::repository::fixtures;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let affiliate = fixtures::affiliate(&db).await;
        let product = fixtures::product(&db, &business.id, 1999, dec!(10)).await;

        let mut sale = fixtures::sale(&product, Some(&affiliate.id), 3);
        sale.external_order_id = Some("order-1".to_string());
        db.sales().insert(&sale).await.unwrap();

        let loaded = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(loaded, sale);
        assert_eq!(loaded.gross, Money::from_cents(5997));
        assert!(loaded.split().is_balanced());

        assert!(db.sales().exists_external_order("order-1").await.unwrap());
        assert!(!db.sales().exists_external_order("order-2").await.unwrap());
        assert_eq!(db.sales().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_sales_are_immutable() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1000, dec!(0)).await;
        let sale = fixtures::sale(&product, None, 1);
        db.sales().insert(&sale).await.unwrap();

        let update = sqlx::query("UPDATE sales SET quantity = 2 WHERE id = ?1")
            .bind(&sale.id)
            .execute(db.pool())
            .await
            .unwrap_err();
        assert!(matches!(DbError::from(update), DbError::ImmutableRecord(_)));

        let delete = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(&sale.id)
            .execute(db.pool())
            .await
            .unwrap_err();
        assert!(matches!(DbError::from(delete), DbError::ImmutableRecord(_)));

        assert_eq!(db.sales().get_by_id(&sale.id).await.unwrap(), Some(sale));
    }

    #[tokio::test]
    async fn test_unbalanced_split_rejected() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1000, dec!(0)).await;

        let mut sale = fixtures::sale(&product, None, 1);
        sale.business_revenue = sale.business_revenue + Money::from_cents(1);

        let err = db.sales().insert(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(_)));
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1000, dec!(0)).await;

        let mut sale = fixtures::sale(&product, None, 1);
        sale.product_id = "ghost".to_string();

        let err = db.sales().insert(&sale).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
