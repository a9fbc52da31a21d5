//! Full-history replay of running balances.
//!
//! Balances are never patched in place. Every change rebuilds them from zero
//! over the whole history, sorted by `(date, sequence)`, with one independent
//! chain per currency.

use std::collections::BTreeMap;

use cashbox_shared::types::{Currency, TransactionId};

use super::balance::{BalanceSnapshot, RunningBalance};
use super::error::LedgerError;
use super::types::{BalancedTransaction, Transaction};

/// Replay engine for running balances.
pub struct LedgerEngine;

impl LedgerEngine {
    /// Sorts movements into replay order: date ascending, then sequence.
    pub fn sort(transactions: &mut [Transaction]) {
        transactions.sort_by_key(Transaction::ordering_key);
    }

    /// Annotates every movement with the running balance of its currency.
    ///
    /// The input order does not matter. The output is in replay order and
    /// is the same for the same set of movements.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a balance cannot be represented.
    pub fn recompute_balances(
        transactions: &[Transaction],
    ) -> Result<Vec<BalancedTransaction>, LedgerError> {
        let mut ordered = transactions.to_vec();
        Self::sort(&mut ordered);

        let mut chains: BTreeMap<Currency, RunningBalance> = BTreeMap::new();
        let mut rows = Vec::with_capacity(ordered.len());

        for transaction in ordered {
            let change = transaction.net_change()?;
            let next = RunningBalance::advance(chains.get(&transaction.currency), change)?;
            chains.insert(transaction.currency, next);

            rows.push(BalancedTransaction {
                transaction,
                balance: next.current_balance,
            });
        }

        Ok(rows)
    }

    /// Closing balance per currency of replayed rows.
    #[must_use]
    pub fn snapshot(rows: &[BalancedTransaction]) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot::new();
        for row in rows {
            snapshot.set(row.transaction.currency, row.balance);
        }
        snapshot
    }

    /// Replays a full history into a ledger state.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a balance cannot be represented.
    pub fn replay(transactions: &[Transaction]) -> Result<LedgerState, LedgerError> {
        let rows = Self::recompute_balances(transactions)?;
        let balances = Self::snapshot(&rows);
        Ok(LedgerState { rows, balances })
    }
}

/// Reconciled ledger: replayed rows plus closing balances.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    rows: Vec<BalancedTransaction>,
    balances: BalanceSnapshot,
}

impl LedgerState {
    /// Rows in replay order (date ascending).
    #[must_use]
    pub fn rows(&self) -> &[BalancedTransaction] {
        &self.rows
    }

    /// Closing balances of the full history.
    #[must_use]
    pub fn balances(&self) -> &BalanceSnapshot {
        &self.balances
    }

    /// Finds a row by id.
    #[must_use]
    pub fn find(&self, id: TransactionId) -> Option<&BalancedTransaction> {
        self.rows.iter().find(|row| row.transaction.id == id)
    }

    /// Number of movements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no movements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
