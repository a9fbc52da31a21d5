//! Currency service for conversion and valuation.
//!
//! Conversions and valuations are exact. Presentation rounding uses Banker's
//! Rounding (`MidpointNearestEven`): money to 2 places, rates to 4.

use cashbox_shared::types::Currency;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;

use super::conversion::ConversionDirection;
use crate::ledger::balance::BalanceSnapshot;
use crate::ledger::validation::validate_rate;
use crate::ledger::LedgerError;

/// Decimal places money is presented with.
pub const MONEY_DECIMALS: u32 = 2;

/// Decimal places rates are presented with.
pub const RATE_DECIMALS: u32 = 4;

/// Currency service for conversion operations.
pub struct CurrencyService;

impl CurrencyService {
    /// Converts an amount across currencies at `rate`.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use cashbox_core::currency::{ConversionDirection, CurrencyService};
    ///
    /// let local =
    ///     CurrencyService::convert(dec!(100), ConversionDirection::ForeignToLocal, dec!(36.5))
    ///         .unwrap();
    /// assert_eq!(local, dec!(3650.0));
    /// ```
    ///
    /// # Errors
    ///
    /// - `InvalidRate` if `rate` is not strictly positive
    /// - `ArithmeticOverflow` if the result cannot be represented
    pub fn convert(
        amount: Decimal,
        direction: ConversionDirection,
        rate: Decimal,
    ) -> Result<Decimal, LedgerError> {
        let rate = validate_rate(rate)?;
        let converted = match direction {
            ConversionDirection::ForeignToLocal => amount.checked_mul(rate),
            ConversionDirection::LocalToForeign => amount.checked_div(rate),
        };
        converted.ok_or(LedgerError::ArithmeticOverflow("converting between currencies"))
    }

    /// Converts an amount held in `currency` into the other currency.
    ///
    /// # Errors
    ///
    /// Same as [`CurrencyService::convert`].
    pub fn equivalent(
        amount: Decimal,
        currency: Currency,
        rate: Decimal,
    ) -> Result<Decimal, LedgerError> {
        Self::convert(amount, ConversionDirection::from_currency(currency), rate)
    }

    /// Values every balance in `reference`.
    ///
    /// The reference balance is taken as is; every other balance is converted
    /// at `rate` and added.
    ///
    /// # Errors
    ///
    /// Same as [`CurrencyService::convert`].
    pub fn consolidated_value(
        balances: &BalanceSnapshot,
        rate: Decimal,
        reference: Currency,
    ) -> Result<Decimal, LedgerError> {
        let rate = validate_rate(rate)?;
        balances.iter().try_fold(Decimal::ZERO, |total, money| {
            let value = if money.currency == reference {
                money.amount
            } else {
                Self::equivalent(money.amount, money.currency, rate)?
            };
            total
                .checked_add(value)
                .ok_or(LedgerError::ArithmeticOverflow("consolidating balances"))
        })
    }

    /// Rounds a money amount for display.
    #[must_use]
    pub fn round_money(value: Decimal) -> Decimal {
        Self::round(value, MONEY_DECIMALS)
    }

    /// Rounds a rate for display.
    #[must_use]
    pub fn round_rate(value: Decimal) -> Decimal {
        Self::round(value, RATE_DECIMALS)
    }

    /// Rounds with Banker's Rounding.
    #[must_use]
    pub fn round(value: Decimal, decimal_places: u32) -> Decimal {
        value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven)
    }
}
