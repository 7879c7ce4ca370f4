//! # Validation Module
//!
//! Input validation for sale requests and catalog writes.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Service call (apps/ledger)                                   │
//! │  └── THIS MODULE: quantity, currency, names, prices, percents          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Commission calculator                                        │
//! │  └── Re-checks percent range (DataIntegrity, never clamped)            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK gross = fee + commission + revenue                          │
//! │  ├── UNIQUE (affiliate_id, product_id) on selections                   │
//! │  └── Triggers refusing UPDATE / DELETE on sales                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::money::Money;
use crate::MAX_CURRENCY_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum length of names shown on dashboards.
pub const MAX_NAME_LEN: usize = 255;

/// Maximum length of stored URLs.
pub const MAX_URL_LEN: usize = 512;

// =============================================================================
// Sale Validators
// =============================================================================

/// Validates a sale quantity.
///
/// Any positive quantity is accepted; a gross that does not fit in cents
/// is reported later as `AmountOverflow`.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates and normalises a currency code.
///
/// ## Rules
/// - 1 to 8 ASCII letters
/// - Returned upper-cased (`"usd"` → `"USD"`)
///
/// ## Example
/// ```rust
/// use omnilink_core::validation::validate_currency;
///
/// assert_eq!(validate_currency(" eur ").unwrap(), "EUR");
/// assert!(validate_currency("").is_err());
/// assert!(validate_currency("US$").is_err());
/// ```
pub fn validate_currency(code: &str) -> ValidationResult<String> {
    let code = code.trim();

    if code.is_empty() {
        return Err(ValidationError::Required {
            field: "currency".to_string(),
        });
    }

    if code.len() > MAX_CURRENCY_LEN {
        return Err(ValidationError::TooLong {
            field: "currency".to_string(),
            max: MAX_CURRENCY_LEN,
        });
    }

    if !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "must contain only letters".to_string(),
        });
    }

    Ok(code.to_ascii_uppercase())
}

/// Validates a non-empty identifier.
pub fn validate_id(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a display or product name.
///
/// ## Rules
/// - Must not be blank
/// - At most [`MAX_NAME_LEN`] characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a list price. Products are never free.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Validates an affiliate commission percent at catalog-write time.
///
/// ## Rules
/// - Between 0 and 100 inclusive
///
/// ## Example
/// ```rust
/// use omnilink_core::validation::validate_commission_percent;
/// use rust_decimal::Decimal;
///
/// assert!(validate_commission_percent(Decimal::new(125, 1)).is_ok());
/// assert!(validate_commission_percent(Decimal::new(1001, 1)).is_err());
/// ```
pub fn validate_commission_percent(percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "affiliate_commission_percent".to_string(),
            min: 0,
            max: 100,
        });
    }
    Ok(())
}

/// Validates an http(s) URL.
///
/// ## Rules
/// - Must not be blank
/// - Must start with `http://` or `https://`
/// - At most [`MAX_URL_LEN`] characters
pub fn validate_url(field: &str, url: &str) -> ValidationResult<()> {
    let url = url.trim();

    if url.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if url.len() > MAX_URL_LEN {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_URL_LEN,
        });
    }

    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.contains(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be an http or https URL".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
