//! # Schema Migrations
//!
//! The SQL under `migrations/sqlite/` is compiled into the binary, so a
//! fresh ledger file gets its tables, indexes and `sales` triggers on first
//! open.
//!
//! Applied migrations are tracked with checksums in `_sqlx_migrations`.
//! Editing a shipped file makes every existing ledger refuse to open, so
//! schema changes go into a new `NNN_description.sql`. The `sales`
//! immutability triggers stay in place across all of them.

use sqlx::migrate::Migrator;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Brings the schema up to date, one transaction per pending file.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    MIGRATOR.run(pool).await?;

    let (known, applied) = migration_status(pool).await?;
    info!(known, applied, "Ledger schema migrated");
    Ok(())
}

/// `(embedded, applied)` migration counts.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((MIGRATOR.migrations.len(), applied as usize))
}
