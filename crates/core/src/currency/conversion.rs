//! Conversion direction between the register's two currencies.
//!
//! Rates are quoted as local per foreign, so foreign amounts are multiplied
//! and local amounts are divided. Results keep full precision; rounding
//! belongs to presentation.

use cashbox_shared::types::Currency;

/// Which way an amount is being converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionDirection {
    /// Foreign amount to local: `amount * rate`.
    ForeignToLocal,
    /// Local amount to foreign: `amount / rate`.
    LocalToForeign,
}

impl ConversionDirection {
    /// Direction that converts an amount held in `currency` into the other one.
    #[must_use]
    pub const fn from_currency(currency: Currency) -> Self {
        match currency {
            Currency::Foreign => Self::ForeignToLocal,
            Currency::Local => Self::LocalToForeign,
        }
    }

    /// Currency the result is expressed in.
    #[must_use]
    pub const fn target(self) -> Currency {
        match self {
            Self::ForeignToLocal => Currency::Local,
            Self::LocalToForeign => Currency::Foreign,
        }
    }
}
