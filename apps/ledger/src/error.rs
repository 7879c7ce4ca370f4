//! # Service Error Type
//!
//! Unified error type for ledger service operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Ledger                             │
//! │                                                                         │
//! │  record_sale(request)                                                  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ── ValidationError ── CoreError ──┐                 │
//! │         │                                            │                 │
//! │         ▼                                            ▼                 │
//! │  Product missing?  ── CoreError::ProductNotFound ── ServiceError       │
//! │         │                                            ▲       │         │
//! │         ▼                                            │       ▼         │
//! │  Database Error?   ── DbError::QueryFailed ──────────┘   code()        │
//! │                                                         "NOT_FOUND"    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The CLI prints failures as [`ErrorBody`]:
//! ```json
//! { "code": "NOT_FOUND", "message": "Product not found: 6f1c..." }
//! ```

use serde::Serialize;

use crate::config::ConfigError;
use omnilink_core::{CoreError, ValidationError};
use omnilink_db::DbError;

/// Errors returned by every service operation.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Core(CoreError::Validation(err))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced product, affiliate or business doesn't exist
    NotFound,

    /// Caller input rejected
    ValidationError,

    /// Stored or configured data breaks a ledger invariant
    DataIntegrity,

    /// Storage failure
    DatabaseError,

    /// Unusable configuration
    ConfigError,

    /// Anything else
    Internal,
}

impl ServiceError {
    /// The error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            ServiceError::Core(err) => match err {
                CoreError::ProductNotFound(_)
                | CoreError::AffiliateNotFound(_)
                | CoreError::BusinessNotFound(_) => ErrorCode::NotFound,
                CoreError::DataIntegrity { .. } => ErrorCode::DataIntegrity,
                CoreError::AmountOverflow | CoreError::Validation(_) => ErrorCode::ValidationError,
            },
            ServiceError::Db(err) => match err {
                DbError::NotFound { .. } => ErrorCode::NotFound,
                DbError::UniqueViolation { .. } | DbError::ForeignKeyViolation { .. } => {
                    ErrorCode::ValidationError
                }
                DbError::ConstraintViolation(_)
                | DbError::ImmutableRecord(_)
                | DbError::CorruptRow { .. } => ErrorCode::DataIntegrity,
                DbError::ConnectionFailed(_)
                | DbError::MigrationFailed(_)
                | DbError::QueryFailed(_)
                | DbError::PoolExhausted => ErrorCode::DatabaseError,
                DbError::Internal(_) => ErrorCode::Internal,
            },
            ServiceError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Serializable form for callers.
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

/// What a caller sees when an operation fails.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}
