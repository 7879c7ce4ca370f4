//! # Affiliate Repository
//!
//! Database operations for affiliate profiles.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use omnilink_core::AffiliateProfile;

/// Repository for affiliate profile operations.
#[derive(Debug, Clone)]
pub struct AffiliateRepository {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct AffiliateRow {
    id: String,
    display_name: String,
    created_at: DateTime<Utc>,
}

impl From<AffiliateRow> for AffiliateProfile {
    fn from(row: AffiliateRow) -> Self {
        AffiliateProfile {
            id: row.id,
            display_name: row.display_name,
            created_at: row.created_at,
        }
    }
}

impl AffiliateRepository {
    /// Creates a new AffiliateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AffiliateRepository { pool }
    }

    /// Inserts an affiliate profile.
    pub async fn insert(&self, affiliate: &AffiliateProfile) -> DbResult<()> {
        debug!(id = %affiliate.id, "Inserting affiliate profile");

        sqlx::query(
            r#"
            INSERT INTO affiliate_profiles (id, display_name, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(&affiliate.id)
        .bind(&affiliate.display_name)
        .bind(affiliate.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an affiliate profile by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<AffiliateProfile>> {
        let row: Option<AffiliateRow> = sqlx::query_as(
            r#"
            SELECT id, display_name, created_at
            FROM affiliate_profiles
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AffiliateProfile::from))
    }

    /// Whether an affiliate with this ID exists.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM affiliate_profiles WHERE id = ?1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(found.is_some())
    }
}
