//! # Database Error Types
//!
//! `DbError` sorts whatever SQLite reports into the cases the ledger
//! service layer gives different error codes to.
//!
//! ```text
//! sqlx::Error ──► DbError ──► ServiceError (apps/ledger) ──► { code, message }
//! ```

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE index rejected the row. `field` is the `table.column` SQLite names.
    #[error("Duplicate {field}")]
    UniqueViolation { field: String },

    /// A product pointing at a missing business, a sale at a missing product.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    /// A CHECK rejected the row, e.g. a sale split that does not add up.
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// UPDATE or DELETE against a sale row.
    #[error("Immutable record: {0}")]
    ImmutableRecord(String),

    /// A stored row cannot be turned back into a domain value.
    #[error("Corrupt {entity} row {id}: {reason}")]
    CorruptRow {
        entity: String,
        id: String,
        reason: String,
    },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection freed up within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    pub fn corrupt(
        entity: impl Into<String>,
        id: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DbError::CorruptRow {
            entity: entity.into(),
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Classifies an error message raised by SQLite itself.
    ///
    /// SQLite reports constraint kinds only in the message text, and the
    /// sales triggers abort with "sales are immutable".
    fn from_sqlite_message(msg: &str) -> Self {
        if let Some(field) = msg.strip_prefix("UNIQUE constraint failed: ") {
            DbError::UniqueViolation {
                field: field.to_string(),
            }
        } else if msg.starts_with("FOREIGN KEY constraint failed") {
            DbError::ForeignKeyViolation {
                message: msg.to_string(),
            }
        } else if msg.starts_with("CHECK constraint failed") {
            DbError::ConstraintViolation(msg.to_string())
        } else if msg.contains("immutable") {
            DbError::ImmutableRecord(msg.to_string())
        } else {
            DbError::QueryFailed(msg.to_string())
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Record", "unknown"),
            sqlx::Error::Database(db_err) => DbError::from_sqlite_message(db_err.message()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            DbError::not_found("Product", "p-1").to_string(),
            "Product not found: p-1"
        );
        assert_eq!(
            DbError::corrupt("Product", "p-1", "bad percent").to_string(),
            "Corrupt Product row p-1: bad percent"
        );
    }

    #[test]
    fn test_sqlite_messages_classified() {
        match DbError::from_sqlite_message("UNIQUE constraint failed: affiliates.id") {
            DbError::UniqueViolation { field } => assert_eq!(field, "affiliates.id"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            DbError::from_sqlite_message("FOREIGN KEY constraint failed"),
            DbError::ForeignKeyViolation { .. }
        ));
        assert!(matches!(
            DbError::from_sqlite_message("CHECK constraint failed: split_sums_to_gross"),
            DbError::ConstraintViolation(_)
        ));
        assert!(matches!(
            DbError::from_sqlite_message("sales are immutable"),
            DbError::ImmutableRecord(_)
        ));
        assert!(matches!(
            DbError::from_sqlite_message("no such table: nope"),
            DbError::QueryFailed(_)
        ));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
