//! Dual-currency conversion and valuation.

pub mod conversion;
pub mod exchange;
pub mod service;

#[cfg(test)]
mod props;

pub use conversion::ConversionDirection;
pub use exchange::ExchangeRate;
pub use service::{CurrencyService, MONEY_DECIMALS, RATE_DECIMALS};
