//! Application configuration management.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::types::{Currency, CurrencyLabels, PageRequest};

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Export configuration.
    #[serde(default)]
    pub export: ExportConfig,
    /// Pagination defaults.
    #[serde(default)]
    pub pagination: PaginationConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_min_connections() -> u32 {
    1
}

/// Ledger configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Display code of the foreign currency.
    #[serde(default = "default_foreign_code")]
    pub foreign_code: String,
    /// Display code of the local currency.
    #[serde(default = "default_local_code")]
    pub local_code: String,
    /// Rate stored on first use when the provider has none.
    #[serde(default)]
    pub default_rate: Option<Decimal>,
    /// Currency the consolidated valuation is expressed in.
    #[serde(default = "default_reference_currency")]
    pub reference_currency: Currency,
}

fn default_foreign_code() -> String {
    "USD".to_string()
}

fn default_local_code() -> String {
    "VES".to_string()
}

fn default_reference_currency() -> Currency {
    Currency::Foreign
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            foreign_code: default_foreign_code(),
            local_code: default_local_code(),
            default_rate: None,
            reference_currency: default_reference_currency(),
        }
    }
}

impl LedgerConfig {
    /// Returns the currency display codes.
    #[must_use]
    pub fn labels(&self) -> CurrencyLabels {
        CurrencyLabels::new(self.foreign_code.clone(), self.local_code.clone())
    }
}

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Directory the export binary writes into.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// File name prefix for generated artifacts.
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    /// Optional currency filter.
    #[serde(default)]
    pub currency: Option<Currency>,
    /// Optional inclusive start date.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Optional inclusive end date.
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

fn default_output_dir() -> String {
    "exports".to_string()
}

fn default_file_prefix() -> String {
    "cash-register".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            currency: None,
            from: None,
            to: None,
        }
    }
}

/// Pagination defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct PaginationConfig {
    /// Rows per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_per_page() -> u32 {
    20
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: default_per_page(),
        }
    }
}

impl PaginationConfig {
    /// First page with the configured size.
    #[must_use]
    pub fn first_page(&self) -> PageRequest {
        PageRequest::new(1, self.per_page)
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `CASHBOX__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or is inconsistent.
    pub fn load() -> AppResult<Self> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("CASHBOX").separator("__"))
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Configuration` describing the first problem found.
    pub fn validate(&self) -> AppResult<()> {
        if let Some(rate) = self.ledger.default_rate {
            if rate <= Decimal::ZERO {
                return Err(AppError::Configuration(format!(
                    "ledger.default_rate must be positive, got {rate}"
                )));
            }
        }

        if self.ledger.foreign_code.trim().is_empty() || self.ledger.local_code.trim().is_empty() {
            return Err(AppError::Configuration(
                "currency codes must not be empty".to_string(),
            ));
        }

        if self.ledger.foreign_code.eq_ignore_ascii_case(&self.ledger.local_code) {
            return Err(AppError::Configuration(format!(
                "foreign and local currency codes must differ, both are {}",
                self.ledger.foreign_code
            )));
        }

        if self.pagination.per_page == 0 {
            return Err(AppError::Configuration(
                "pagination.per_page must be at least 1".to_string(),
            ));
        }

        if let (Some(from), Some(to)) = (self.export.from, self.export.to) {
            if from > to {
                return Err(AppError::Configuration(format!(
                    "export.from ({from}) is after export.to ({to})"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        temp_env::with_vars(vars.to_vec(), f);
    }

    #[test]
    fn test_load_defaults_from_env() {
        with_env(
            &[
                ("CASHBOX__DATABASE__URL", Some("postgres://localhost/cashbox")),
                ("CASHBOX__LEDGER__DEFAULT_RATE", None),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.database.url, "postgres://localhost/cashbox");
                assert_eq!(config.database.max_connections, 5);
                assert_eq!(config.ledger.foreign_code, "USD");
                assert_eq!(config.ledger.local_code, "VES");
                assert_eq!(config.ledger.default_rate, None);
                assert_eq!(config.ledger.reference_currency, Currency::Foreign);
                assert_eq!(config.export.file_prefix, "cash-register");
                assert_eq!(config.pagination.per_page, 20);
            },
        );
    }

    #[test]
    fn test_load_overrides_from_env() {
        with_env(
            &[
                ("CASHBOX__DATABASE__URL", Some("postgres://localhost/cashbox")),
                ("CASHBOX__LEDGER__DEFAULT_RATE", Some("36.5")),
                ("CASHBOX__LEDGER__REFERENCE_CURRENCY", Some("local")),
                ("CASHBOX__EXPORT__FROM", Some("2024-01-01")),
                ("CASHBOX__EXPORT__TO", Some("2024-01-31")),
            ],
            || {
                let config = AppConfig::load().unwrap();
                assert_eq!(config.ledger.default_rate, Some(dec!(36.5)));
                assert_eq!(config.ledger.reference_currency, Currency::Local);
                assert_eq!(config.export.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(config.export.to, NaiveDate::from_ymd_opt(2024, 1, 31));
            },
        );
    }

    #[test]
    fn test_load_rejects_reversed_export_range() {
        with_env(
            &[
                ("CASHBOX__DATABASE__URL", Some("postgres://localhost/cashbox")),
                ("CASHBOX__EXPORT__FROM", Some("2024-02-01")),
                ("CASHBOX__EXPORT__TO", Some("2024-01-01")),
            ],
            || {
                let err = AppConfig::load().unwrap_err();
                assert!(matches!(err, AppError::Configuration(_)));
            },
        );
    }

    fn sample() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "postgres://localhost/cashbox".to_string(),
                max_connections: 5,
                min_connections: 1,
            },
            ledger: LedgerConfig::default(),
            export: ExportConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        let mut config = sample();
        config.ledger.default_rate = Some(Decimal::ZERO);
        assert!(matches!(
            config.validate(),
            Err(AppError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_same_codes() {
        let mut config = sample();
        config.ledger.local_code = "usd".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let mut config = sample();
        config.pagination.per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_labels_and_first_page() {
        let config = sample();
        assert_eq!(config.ledger.labels(), CurrencyLabels::new("USD", "VES"));
        assert_eq!(config.pagination.first_page(), PageRequest::new(1, 20));
    }
}
