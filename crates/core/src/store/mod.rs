//! Persistence interfaces the ledger depends on.
//!
//! The db crate implements these against Postgres; [`memory`] provides
//! in-process implementations for tests and tools.

pub mod error;
pub mod memory;

use std::future::Future;

use cashbox_shared::types::TransactionId;
use rust_decimal::Decimal;

use crate::currency::ExchangeRate;
use crate::ledger::{PersistTransaction, Transaction, TransactionChanges};

pub use error::StoreError;
pub use memory::{MemoryRateProvider, MemoryTransactionStore};

/// Durable storage of cash register movements.
///
/// Implementations assign `id`, `sequence` and timestamps on create. The
/// sequence must grow with every insert so same-day movements keep their
/// insertion order.
pub trait TransactionStore: Send + Sync {
    /// Lists every stored movement, in no particular order.
    fn list_all(&self) -> impl Future<Output = Result<Vec<Transaction>, StoreError>> + Send;

    /// Finds a movement by id.
    fn get(
        &self,
        id: TransactionId,
    ) -> impl Future<Output = Result<Option<Transaction>, StoreError>> + Send;

    /// Persists a validated movement.
    fn create(
        &self,
        input: PersistTransaction,
    ) -> impl Future<Output = Result<Transaction, StoreError>> + Send;

    /// Replaces the editable fields of a movement. Returns `None` if the id is
    /// unknown.
    fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> impl Future<Output = Result<Option<Transaction>, StoreError>> + Send;

    /// Removes a movement. Returns `false` if the id is unknown.
    fn delete(&self, id: TransactionId) -> impl Future<Output = Result<bool, StoreError>> + Send;

    /// Shifts every movement's date by `offset_days` in one step and returns
    /// how many were changed.
    fn shift_dates(&self, offset_days: i64) -> impl Future<Output = Result<u64, StoreError>> + Send;
}

/// Holder of the single current exchange rate.
pub trait ExchangeRateProvider: Send + Sync {
    /// Returns the current rate, or `None` if it was never set.
    fn get(&self) -> impl Future<Output = Result<Option<ExchangeRate>, StoreError>> + Send;

    /// Replaces the current rate. The caller has already validated it.
    fn set(&self, rate: Decimal) -> impl Future<Output = Result<ExchangeRate, StoreError>> + Send;
}
