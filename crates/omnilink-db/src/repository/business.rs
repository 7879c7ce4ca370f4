//! # Business Repository
//!
//! Database operations for business profiles.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use omnilink_core::BusinessProfile;

/// Repository for business profile operations.
#[derive(Debug, Clone)]
pub struct BusinessRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct BusinessRow {
    id: String,
    display_name: String,
    website_url: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BusinessRow> for BusinessProfile {
    fn from(row: BusinessRow) -> Self {
        BusinessProfile {
            id: row.id,
            display_name: row.display_name,
            website_url: row.website_url,
            created_at: row.created_at,
        }
    }
}

impl BusinessRepository {
    /// Creates a new BusinessRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BusinessRepository { pool }
    }

    /// Inserts a business profile.
    pub async fn insert(&self, business: &BusinessProfile) -> DbResult<()> {
        debug!(id = %business.id, "Inserting business profile");

        sqlx::query(
            r#"
            INSERT INTO business_profiles (id, display_name, website_url, created_at)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&business.id)
        .bind(&business.display_name)
        .bind(&business.website_url)
        .bind(business.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a business profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<BusinessProfile>> {
        let row: Option<BusinessRow> = sqlx::query_as(
            r#"
            SELECT id, display_name, website_url, created_at
            FROM business_profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(BusinessProfile::from))
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::fixtures;

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;

        let loaded = db.businesses().get_by_id(&business.id).await.unwrap();
        assert_eq!(loaded, Some(business));

        assert!(db.businesses().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = fixtures::database().await;
        let business = fixtures::business(&db).await;

        let err = db.businesses().insert(&business).await.unwrap_err();
        assert!(matches!(err, crate::DbError::UniqueViolation { .. }));
    }
}
