//! Filtered and paginated views of the reconciled ledger.

pub mod filter;
pub mod service;

#[cfg(test)]
mod tests;

pub use filter::{DateRange, SortOrder, TransactionQuery};
pub use service::{CurrencyTotals, LedgerPage, MovementTotals, QueryService};
