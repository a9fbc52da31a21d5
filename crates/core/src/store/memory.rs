//! In-process store and rate provider.

use cashbox_shared::types::TransactionId;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use super::{ExchangeRateProvider, StoreError, TransactionStore};
use crate::currency::ExchangeRate;
use crate::ledger::validation::shift_date;
use crate::ledger::{PersistTransaction, Transaction, TransactionChanges};

#[derive(Debug, Default)]
struct Rows {
    transactions: Vec<Transaction>,
    next_sequence: i64,
}

/// Transaction store backed by a `Vec` behind an async lock.
#[derive(Debug, Default)]
pub struct MemoryTransactionStore {
    rows: RwLock<Rows>,
}

impl MemoryTransactionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for MemoryTransactionStore {
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.rows.read().await.transactions.clone())
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self
            .rows
            .read()
            .await
            .transactions
            .iter()
            .find(|tx| tx.id == id)
            .cloned())
    }

    async fn create(&self, input: PersistTransaction) -> Result<Transaction, StoreError> {
        let mut rows = self.rows.write().await;
        rows.next_sequence += 1;

        let now = Utc::now();
        let transaction = Transaction {
            id: TransactionId::new(),
            sequence: rows.next_sequence,
            date: input.date,
            concept: input.concept,
            currency: input.currency,
            entry: input.entry,
            exit: input.exit,
            rate_at_creation: input.rate_at_creation,
            created_at: now,
            updated_at: now,
        };
        rows.transactions.push(transaction.clone());
        Ok(transaction)
    }

    async fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError> {
        let mut rows = self.rows.write().await;
        let Some(tx) = rows.transactions.iter_mut().find(|tx| tx.id == id) else {
            return Ok(None);
        };

        changes.apply_to(tx);
        tx.updated_at = Utc::now();
        Ok(Some(tx.clone()))
    }

    async fn delete(&self, id: TransactionId) -> Result<bool, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.transactions.len();
        rows.transactions.retain(|tx| tx.id != id);
        Ok(rows.transactions.len() != before)
    }

    async fn shift_dates(&self, offset_days: i64) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;

        // All or nothing: compute every new date before touching any row.
        let shifted = rows
            .transactions
            .iter()
            .map(|tx| shift_date(tx.date, offset_days))
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::backend)?;

        let now = Utc::now();
        for (tx, date) in rows.transactions.iter_mut().zip(shifted) {
            tx.date = date;
            tx.updated_at = now;
        }
        Ok(rows.transactions.len() as u64)
    }
}

/// Rate provider holding the current rate in memory.
#[derive(Debug, Default)]
pub struct MemoryRateProvider {
    current: RwLock<Option<ExchangeRate>>,
}

impl MemoryRateProvider {
    /// Creates a provider with no rate set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider with `rate` already set.
    #[must_use]
    pub fn with_rate(rate: Decimal) -> Self {
        Self {
            current: RwLock::new(Some(ExchangeRate {
                rate,
                updated_at: Utc::now(),
            })),
        }
    }
}

impl ExchangeRateProvider for MemoryRateProvider {
    async fn get(&self) -> Result<Option<ExchangeRate>, StoreError> {
        Ok(*self.current.read().await)
    }

    async fn set(&self, rate: Decimal) -> Result<ExchangeRate, StoreError> {
        let updated = ExchangeRate {
            rate,
            updated_at: Utc::now(),
        };
        *self.current.write().await = Some(updated);
        Ok(updated)
    }
}
