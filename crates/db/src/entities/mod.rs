//! `SeaORM` entity definitions.

pub mod cash_transactions;
pub mod exchange_rate_settings;
