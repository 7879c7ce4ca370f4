//! Ledger configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable               | Default         |
//! |------------------------|-----------------|
//! | `DATABASE_PATH`        | `./omnilink.db` |
//! | `DB_MAX_CONNECTIONS`   | `5`             |
//! | `PLATFORM_FEE_PERCENT` | `2.0`           |
//! | `DEFAULT_CURRENCY`     | `USD`           |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use omnilink_core::validation::validate_currency;
use omnilink_core::{CommissionCalculator, Percent, DEFAULT_CURRENCY, DEFAULT_PLATFORM_FEE_PERCENT};
use omnilink_db::DbConfig;

const IN_MEMORY_PATH: &str = ":memory:";

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// SQLite database file
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Platform fee taken from every sale, `0..=100`
    pub platform_fee_percent: Decimal,

    /// Currency recorded when a sale doesn't name one
    pub default_currency: String,
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// [`LedgerConfig::load`] passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = LedgerConfig {
            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "./omnilink.db".to_string())
                .into(),

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            platform_fee_percent: Decimal::from_str(
                lookup("PLATFORM_FEE_PERCENT")
                    .unwrap_or_else(|| DEFAULT_PLATFORM_FEE_PERCENT.to_string())
                    .trim(),
            )
            .map_err(|_| ConfigError::InvalidValue("PLATFORM_FEE_PERCENT".to_string()))?,

            default_currency: lookup("DEFAULT_CURRENCY")
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        };

        config.validated()
    }

    /// Configuration backed by a private in-memory database.
    pub fn for_testing() -> Self {
        LedgerConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            db_max_connections: 1,
            platform_fee_percent: Decimal::new(20, 1),
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    pub fn with_database_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database_path = path.into();
        self
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.db_max_connections = max;
        self
    }

    pub fn with_platform_fee_percent(mut self, percent: Decimal) -> Self {
        self.platform_fee_percent = percent;
        self
    }

    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    /// Checks ranges and normalises the currency code.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Percent::new(self.platform_fee_percent)
            .map_err(|_| ConfigError::InvalidValue("PLATFORM_FEE_PERCENT".to_string()))?;

        self.default_currency = validate_currency(&self.default_currency)
            .map_err(|_| ConfigError::InvalidValue("DEFAULT_CURRENCY".to_string()))?;

        Ok(self)
    }

    /// The calculator every sale is split with.
    pub fn calculator(&self) -> Result<CommissionCalculator, ConfigError> {
        CommissionCalculator::new(self.platform_fee_percent)
            .map_err(|_| ConfigError::InvalidValue("PLATFORM_FEE_PERCENT".to_string()))
    }

    /// Pool settings for this configuration.
    pub fn db_config(&self) -> DbConfig {
        if self.database_path.as_os_str() == IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.database_path).max_connections(self.db_max_connections)
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_path, PathBuf::from("./omnilink.db"));
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.platform_fee_percent, dec!(2.0));
        assert_eq!(config.default_currency, "USD");
    }

    #[test]
    fn test_overrides_from_environment() {
        let config = LedgerConfig::from_lookup(lookup(&[
            ("DATABASE_PATH", "/var/lib/omnilink/ledger.db"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("PLATFORM_FEE_PERCENT", " 3.5 "),
            ("DEFAULT_CURRENCY", "eur"),
        ]))
        .unwrap();

        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.platform_fee_percent, dec!(3.5));
        assert_eq!(config.default_currency, "EUR");
        assert!(!config.db_config().is_in_memory());
    }

    #[test]
    fn test_invalid_values_rejected() {
        for (key, value) in [
            ("PLATFORM_FEE_PERCENT", "lots"),
            ("PLATFORM_FEE_PERCENT", "120"),
            ("PLATFORM_FEE_PERCENT", "-1"),
            ("DB_MAX_CONNECTIONS", "0"),
            ("DB_MAX_CONNECTIONS", "many"),
            ("DEFAULT_CURRENCY", "US$"),
        ] {
            let err = LedgerConfig::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid value for {key}"));
        }
    }

    #[test]
    fn test_for_testing_is_in_memory() {
        let config = LedgerConfig::for_testing().with_platform_fee_percent(dec!(5));
        assert!(config.db_config().is_in_memory());
        assert_eq!(
            config.calculator().unwrap().platform_fee_percent().value(),
            dec!(5)
        );
    }
}
