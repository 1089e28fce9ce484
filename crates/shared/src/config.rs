//! Application configuration management.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::types::CurrencyCode;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Exchange rate configuration.
    #[serde(default)]
    pub rates: RatesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Currency every balance is normalized into.
    #[serde(default)]
    pub currency: CurrencyCode,
    /// Balances within this distance of zero count as settled.
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            currency: CurrencyCode::default(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_tolerance() -> Decimal {
    Decimal::new(1, 2) // one cent
}

/// Exchange rate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RatesConfig {
    /// Extra rates layered over the built-in table: base -> quote -> rate,
    /// where 1 base = rate quote.
    #[serde(default)]
    pub overrides: BTreeMap<String, BTreeMap<String, Decimal>>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON log lines instead of the human readable format.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
        }
    }
}

fn default_filter() -> String {
    "tripsplit=info".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("TRIPSPLIT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
