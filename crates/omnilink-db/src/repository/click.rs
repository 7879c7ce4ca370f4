//! # Click Repository
//!
//! Append-only log of tracked affiliate link visits.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use omnilink_core::Click;

/// Repository for click tracking.
#[derive(Debug, Clone)]
pub struct ClickRepository {
    pool: SqlitePool,
}

impl ClickRepository {
    /// Creates a new ClickRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ClickRepository { pool }
    }

    /// Records a click.
    pub async fn insert(&self, click: &Click) -> DbResult<()> {
        debug!(id = %click.id, product_id = %click.product_id, "Inserting click");

        sqlx::query(
            r#"
            INSERT INTO clicks (id, product_id, affiliate_id, ip_address, user_agent, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&click.id)
        .bind(&click.product_id)
        .bind(&click.affiliate_id)
        .bind(&click.ip_address)
        .bind(&click.user_agent)
        .bind(click.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of clicks recorded for a product.
    pub async fn count_for_product(&self, product_id: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks WHERE product_id = ?1")
            .bind(product_id)
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

    #[tokio::test]
    async fn test_insert_and_count() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;
        let product = fixtures::product(&db, &business.id, 1999, dec!(10)).await;

        let click = Click {
            id: generate_id(),
            product_id: product.id.clone(),
            affiliate_id: None,
            ip_address: Some("203.0.113.7".to_string()),
            user_agent: Some("curl/8.0".to_string()),
            created_at: Utc::now(),
        };
        db.clicks().insert(&click).await.unwrap();

        assert_eq!(db.clicks().count_for_product(&product.id).await.unwrap(), 1);
        assert_eq!(db.clicks().count_for_product("other").await.unwrap(), 0);
    }
}
