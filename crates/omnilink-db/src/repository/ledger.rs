//! # Ledger Repository
//!
//! Read-only aggregation over the sales ledger.
//!
//! ## Aggregations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Ledger Aggregation                                 │
//! │                                                                         │
//! │  affiliate_totals(affiliate_id)                                        │
//! │     COUNT(*), SUM(gross), SUM(commission) WHERE affiliate_id = ?       │
//! │     └── no sales → one row of zeros (COALESCE)                         │
//! │                                                                         │
//! │  product_totals([p1, p2, p3])                                          │
//! │     SELECT ... WHERE product_id IN (...) GROUP BY product_id           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │     { p1: row, p3: row }   ← only products that have sales             │
//! │       │                                                                 │
//! │       ▼  left join in request order                                    │
//! │     [p1: row, p2: zeros, p3: row]                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every figure is a SQL `SUM` over the frozen integer-cent columns of
//! `sales`; nothing is recomputed from the current catalog.

use std::collections::{HashMap, HashSet};

use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use omnilink_core::{AffiliateLedger, Money, ProductLedger};

/// Upper bound on bound parameters per `IN (...)` query.
const IN_CHUNK_SIZE: usize = 500;

/// Repository for ledger aggregation queries.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct AffiliateTotalsRow {
    sales_count: i64,
    gross_cents: i64,
    commission_cents: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct ProductTotalsRow {
    product_id: String,
    sales_count: i64,
    gross_cents: i64,
    affiliate_cents: i64,
    platform_cents: i64,
    business_cents: i64,
}

impl From<ProductTotalsRow> for ProductLedger {
    fn from(row: ProductTotalsRow) -> Self {
        ProductLedger {
            product_id: row.product_id,
            sales_count: row.sales_count,
            gross: Money::from_cents(row.gross_cents),
            affiliate: Money::from_cents(row.affiliate_cents),
            platform: Money::from_cents(row.platform_cents),
            business: Money::from_cents(row.business_cents),
        }
    }
}

impl LedgerRepository {
    /// Creates a new LedgerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LedgerRepository { pool }
    }

    /// Totals of every sale attributed to an affiliate.
    ///
    /// An affiliate with no sales (or one that doesn't exist) gets zeros.
    pub async fn affiliate_totals(&self, affiliate_id: &str) -> DbResult<AffiliateLedger> {
        debug!(affiliate_id = %affiliate_id, "Aggregating affiliate ledger");

        let row: AffiliateTotalsRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS sales_count,
                COALESCE(SUM(gross_cents), 0) AS gross_cents,
                COALESCE(SUM(affiliate_commission_cents), 0) AS commission_cents
            FROM sales
            WHERE affiliate_id = ?1
            "#,
        )
        .bind(affiliate_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(AffiliateLedger {
            affiliate_id: affiliate_id.to_string(),
            sales_count: row.sales_count,
            gross_amount: Money::from_cents(row.gross_cents),
            commissions_earned: Money::from_cents(row.commission_cents),
        })
    }

    /// Per-product totals, one row per requested id in request order.
    ///
    /// Ids without sales (including unknown ids) get an all-zero row, and a
    /// repeated id gets a row each time it appears.
    pub async fn product_totals(&self, product_ids: &[String]) -> DbResult<Vec<ProductLedger>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }

        debug!(count = product_ids.len(), "Aggregating product ledger");

        let mut seen = HashSet::new();
        let unique: Vec<&str> = product_ids
            .iter()
            .map(String::as_str)
            .filter(|id| seen.insert(*id))
            .collect();

        let mut totals: HashMap<String, ProductLedger> = HashMap::with_capacity(unique.len());

        for chunk in unique.chunks(IN_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                r#"
                SELECT
                    product_id,
                    COUNT(*) AS sales_count,
                    COALESCE(SUM(gross_cents), 0) AS gross_cents,
                    COALESCE(SUM(affiliate_commission_cents), 0) AS affiliate_cents,
                    COALESCE(SUM(platform_fee_cents), 0) AS platform_cents,
                    COALESCE(SUM(business_revenue_cents), 0) AS business_cents
                FROM sales
                WHERE product_id IN (
                "#,
            );

            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") GROUP BY product_id");

            let rows: Vec<ProductTotalsRow> =
                builder.build_query_as().fetch_all(&self.pool).await?;

            for row in rows {
                totals.insert(row.product_id.clone(), ProductLedger::from(row));
            }
        }

        Ok(product_ids
            .iter()
            .map(|id| {
                totals
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| ProductLedger::empty(id.as_str()))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::repository::fixtures;
    use omnilink_core::Product;
    use rust_decimal_macros::dec;

    async fn record(db: &Database, product: &Product, affiliate_id: Option<&str>, qty: i64) {
        let sale = fixtures::sale(product, affiliate_id, qty);
        db.sales().insert(&sale).await.unwrap();
    }

    #[tokio::test]
    async fn test_affiliate_without_sales_is_zero() {
        let db = fixtures::database().await;
        let affiliate = fixtures::affiliate(&db).await;

        let ledger = db.ledger().affiliate_totals(&affiliate.id).await.unwrap();
        assert_eq!(ledger, AffiliateLedger::empty(affiliate.id.as_str()));
    }

    #[tokio::test]
    async fn test_affiliate_totals_sum_attributed_sales_only() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let affiliate = fixtures::affiliate(&db).await;
        let product = fixtures::product(&db, &business.id, 1999, dec!(10)).await;

        record(&db, &product, Some(&affiliate.id), 3).await;
        record(&db, &product, Some(&affiliate.id), 1).await;
        record(&db, &product, None, 5).await;

        let ledger = db.ledger().affiliate_totals(&affiliate.id).await.unwrap();
        assert_eq!(ledger.sales_count, 2);
        // 59.97 + 19.99
        assert_eq!(ledger.gross_amount, Money::from_cents(7996));
        // 6.00 + 2.00
        assert_eq!(ledger.commissions_earned, Money::from_cents(800));

        // Reading twice gives the same answer
        let again = db.ledger().affiliate_totals(&affiliate.id).await.unwrap();
        assert_eq!(ledger, again);
    }

    #[tokio::test]
    async fn test_product_totals_left_join_in_request_order() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let sold = fixtures::product(&db, &business.id, 1000, dec!(0)).await;
        let unsold = fixtures::product(&db, &business.id, 2000, dec!(0)).await;

        record(&db, &sold, None, 1).await;
        record(&db, &sold, None, 2).await;

        let ids = vec![
            unsold.id.clone(),
            "ghost".to_string(),
            sold.id.clone(),
            unsold.id.clone(),
        ];
        let rows = db.ledger().product_totals(&ids).await.unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ProductLedger::empty(unsold.id.as_str()));
        assert_eq!(rows[1], ProductLedger::empty("ghost"));
        assert_eq!(rows[3], ProductLedger::empty(unsold.id.as_str()));

        let totals = &rows[2];
        assert_eq!(totals.product_id, sold.id);
        assert_eq!(totals.sales_count, 2);
        assert_eq!(totals.gross, Money::from_cents(3000));
        assert_eq!(totals.affiliate, Money::zero());
        assert_eq!(totals.platform, Money::from_cents(60));
        assert_eq!(totals.business, Money::from_cents(2940));
        assert_eq!(
            totals.gross,
            totals.affiliate + totals.platform + totals.business
        );
    }

    #[tokio::test]
    async fn test_product_totals_empty_input() {
        let db = fixtures::database().await;
        assert!(db.ledger().product_totals(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_product_totals_spans_chunks() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1000, dec!(0)).await;
        record(&db, &product, None, 1).await;

        let mut ids: Vec<String> = (0..1200).map(|i| format!("missing-{i}")).collect();
        ids.push(product.id.clone());

        let rows = db.ledger().product_totals(&ids).await.unwrap();
        assert_eq!(rows.len(), 1201);
        assert_eq!(rows[1200].sales_count, 1);
        assert!(rows[..1200].iter().all(|r| r.sales_count == 0));
    }
}
