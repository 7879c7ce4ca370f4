//! # Selection Repository
//!
//! Which products each affiliate has opted into promoting.
//!
//! Selecting twice is not an error: the `(affiliate_id, product_id)` unique
//! key turns the second insert into a no-op, reported as
//! [`SelectionOutcome::AlreadySelected`].

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::product::{into_products, ProductRow};
use omnilink_core::{AffiliateSelection, Product, SelectionOutcome};

/// Repository for affiliate selections.
#[derive(Debug, Clone)]
pub struct SelectionRepository {
    pool: SqlitePool,
}

impl SelectionRepository {
    /// Creates a new SelectionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SelectionRepository { pool }
    }

    /// Records a selection unless the pair already exists.
    pub async fn insert(&self, selection: &AffiliateSelection) -> DbResult<SelectionOutcome> {
        debug!(
            affiliate_id = %selection.affiliate_id,
            product_id = %selection.product_id,
            "Inserting selection"
        );

        let result = sqlx::query(
            r#"
            INSERT INTO affiliate_selections (id, affiliate_id, product_id, created_at)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT (affiliate_id, product_id) DO NOTHING
            "#,
        )
        .bind(&selection.id)
        .bind(&selection.affiliate_id)
        .bind(&selection.product_id)
        .bind(selection.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Ok(SelectionOutcome::AlreadySelected)
        } else {
            Ok(SelectionOutcome::Selected)
        }
    }

    /// Products an affiliate has selected, most recent selection first.
    pub async fn list_products_for_affiliate(&self, affiliate_id: &str) -> DbResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(
            r#"
            SELECT
                p.id, p.business_id, p.name, p.description, p.price_cents,
                p.sales_page_url, p.affiliate_commission_percent, p.image_url,
                p.is_active, p.created_at, p.updated_at
            FROM affiliate_selections s
            JOIN products p ON p.id = s.product_id
            WHERE s.affiliate_id = ?1
            ORDER BY s.created_at DESC, s.rowid DESC
            "#,
        )
        .bind(affiliate_id)
        .fetch_all(&self.pool)
        .await?;

        into_products(rows)
    }

    /// Number of products an affiliate has selected.
    pub async fn count_for_affiliate(&self, affiliate_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM affiliate_selections WHERE affiliate_id = ?1")
                .bind(affiliate_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{fixtures, generate_id};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn selection(affiliate_id: &str, product_id: &str) -> AffiliateSelection {
        AffiliateSelection {
            id: generate_id(),
            affiliate_id: affiliate_id.to_string(),
            product_id: product_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_select_twice_is_already_selected() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let affiliate = fixtures::affiliate(&db).await;
        let product = fixtures::product(&db, &business.id, 1999, dec!(10)).await;

        let first = db
            .selections()
            .insert(&selection(&affiliate.id, &product.id))
            .await
            .unwrap();
        let second = db
            .selections()
            .insert(&selection(&affiliate.id, &product.id))
            .await
            .unwrap();

        assert_eq!(first, SelectionOutcome::Selected);
        assert_eq!(second, SelectionOutcome::AlreadySelected);
        assert_eq!(db.selections().count_for_affiliate(&affiliate.id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_list_products_for_affiliate() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let affiliate = fixtures::affiliate(&db).await;
        let older = fixtures::product(&db, &business.id, 100, dec!(5)).await;
        let newer = fixtures::product(&db, &business.id, 200, dec!(5)).await;

        db.selections()
            .insert(&selection(&affiliate.id, &older.id))
            .await
            .unwrap();
        db.selections()
            .insert(&selection(&affiliate.id, &newer.id))
            .await
            .unwrap();

        let listed = db
            .selections()
            .list_products_for_affiliate(&affiliate.id)
            .await
            .unwrap();
        let ids: Vec<&str> = listed.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec![newer.id.as_str(), older.id.as_str()]);

        assert!(db
            .selections()
            .list_products_for_affiliate("nobody")
            .await
            .unwrap()
            .is_empty());
    }
}
