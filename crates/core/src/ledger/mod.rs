//! Cash register ledger.
//!
//! This module implements the dual-currency cash book:
//! - Movement domain types (entries and exits per currency)
//! - Business rule validation
//! - Running balances and per-currency snapshots
//! - The replay engine that rebuilds balances from full history
//! - The reconciler that applies mutations through the store
//! - Error types for ledger operations

pub mod balance;
pub mod engine;
pub mod error;
pub mod reconciler;
pub mod types;
pub mod validation;

#[cfg(test)]
mod engine_props;

pub use balance::{BalanceSnapshot, RunningBalance};
pub use engine::{LedgerEngine, LedgerState};
pub use error::{ErrorKind, LedgerError, Operation};
pub use reconciler::BalanceReconciler;
pub use types::{
    BalancedTransaction, MovementSide, NewTransaction, PersistTransaction, Transaction,
    TransactionChanges, TransactionPatch,
};
