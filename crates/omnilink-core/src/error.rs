//! # Error Types
//!
//! Domain-specific error types for omnilink-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  omnilink-core errors (this file)                                      │
//! │  ├── CoreError        - Domain errors (not found, data integrity)      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  omnilink-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  apps/ledger errors                                                    │
//! │  └── ServiceError     - What callers see (with an error code)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product is missing or inactive.
    ///
    /// ## When This Occurs
    /// - Product ID doesn't exist
    /// - Product was soft-deleted (`is_active = false`)
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Affiliate profile is missing where one is required (selections).
    ///
    /// Recording a sale never raises this: an unknown affiliate there is
    /// recorded as an unattributed sale.
    #[error("Affiliate not found: {0}")]
    AffiliateNotFound(String),

    /// Business profile is missing.
    #[error("Business not found: {0}")]
    BusinessNotFound(String),

    /// A configured or stored value breaks an invariant that upstream
    /// validation should have enforced.
    ///
    /// ## When This Occurs
    /// - Commission or platform-fee percent outside `[0, 100]`
    /// - Fee plus commission exceeding the gross amount
    ///
    /// Fatal to the operation. Never clamped.
    #[error("Data integrity violation: {field} = {value}")]
    DataIntegrity { field: String, value: String },

    /// An amount does not fit in 64-bit cents.
    #[error("Monetary amount overflow")]
    AmountOverflow,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Returns true for the "referenced entity does not exist" family.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ProductNotFound(_)
                | CoreError::AffiliateNotFound(_)
                | CoreError::BusinessNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid amount, invalid currency code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
