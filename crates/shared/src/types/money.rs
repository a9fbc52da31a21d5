//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount held in one of the register's currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount.
    pub amount: Decimal,
    /// The currency the amount is held in.
    pub currency: Currency,
}

/// The two currencies a cash register keeps separate books for.
///
/// The exchange rate is always quoted as local units per one foreign unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// The hard currency the rate is quoted against (e.g. USD).
    Foreign,
    /// The currency of the country the register operates in (e.g. VES).
    Local,
}

impl Currency {
    /// Every currency, in a fixed order.
    pub const ALL: [Self; 2] = [Self::Foreign, Self::Local];

    /// Returns the stable lowercase identifier used in storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foreign => "foreign",
            Self::Local => "local",
        }
    }

    /// Returns the opposite currency.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Foreign => Self::Local,
            Self::Local => Self::Foreign,
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "foreign" => Ok(Self::Foreign),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

/// Display codes for the two currencies (e.g. `USD` / `VES`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyLabels {
    /// Code shown for [`Currency::Foreign`].
    pub foreign: String,
    /// Code shown for [`Currency::Local`].
    pub local: String,
}

impl CurrencyLabels {
    /// Creates a label set.
    #[must_use]
    pub fn new(foreign: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            foreign: foreign.into(),
            local: local.into(),
        }
    }

    /// Returns the display code for a currency.
    #[must_use]
    pub fn code(&self, currency: Currency) -> &str {
        match currency {
            Currency::Foreign => &self.foreign,
            Currency::Local => &self.local,
        }
    }
}

impl Default for CurrencyLabels {
    fn default() -> Self {
        Self::new("USD", "VES")
    }
}
