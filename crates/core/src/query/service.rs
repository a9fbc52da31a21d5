//! Filtering, totals and paging over the reconciled ledger.
//!
//! Balances shown on filtered rows always come from the full-history replay;
//! filtering never recomputes them.

use std::collections::BTreeMap;

use cashbox_shared::types::{Currency, PageRequest, PageResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filter::{SortOrder, TransactionQuery};
use crate::ledger::{BalanceSnapshot, BalancedTransaction, LedgerError, LedgerState};

/// Entry and exit sums of one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    /// Sum of entries.
    pub entries: Decimal,
    /// Sum of exits.
    pub exits: Decimal,
}

impl CurrencyTotals {
    /// Entries minus exits.
    #[must_use]
    pub fn net(&self) -> Decimal {
        self.entries - self.exits
    }
}

/// Movement totals per currency over a filtered set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTotals {
    totals: BTreeMap<Currency, CurrencyTotals>,
}

impl MovementTotals {
    /// Totals of a currency; zero if it had no movements.
    #[must_use]
    pub fn get(&self, currency: Currency) -> CurrencyTotals {
        self.totals.get(&currency).copied().unwrap_or_default()
    }

    /// Iterates every currency in [`Currency::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Currency, CurrencyTotals)> + '_ {
        Currency::ALL
            .into_iter()
            .map(|currency| (currency, self.get(currency)))
    }

    fn add(&mut self, row: &BalancedTransaction) -> Result<(), LedgerError> {
        let overflow = || LedgerError::ArithmeticOverflow("summing movement totals");
        let totals = self.totals.entry(row.transaction.currency).or_default();
        totals.entries = totals
            .entries
            .checked_add(row.transaction.entry)
            .ok_or_else(overflow)?;
        totals.exits = totals
            .exits
            .checked_add(row.transaction.exit)
            .ok_or_else(overflow)?;
        Ok(())
    }
}

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerPage {
    /// Rows of the page in display order, with paging metadata.
    pub rows: PageResponse<BalancedTransaction>,
    /// Totals over every filtered row, not just this page.
    pub totals: MovementTotals,
    /// Closing balances of the full history.
    pub balances: BalanceSnapshot,
}

/// Query service over a reconciled ledger.
pub struct QueryService;

impl QueryService {
    /// Returns the rows matching `query`, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDateRange` if the range is reversed.
    pub fn filter(
        state: &LedgerState,
        query: &TransactionQuery,
    ) -> Result<Vec<BalancedTransaction>, LedgerError> {
        query.validate()?;
        Ok(state
            .rows()
            .iter()
            .filter(|row| query.matches(&row.transaction))
            .cloned()
            .collect())
    }

    /// Sums entries and exits per currency.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a sum cannot be represented.
    pub fn totals(rows: &[BalancedTransaction]) -> Result<MovementTotals, LedgerError> {
        let mut totals = MovementTotals::default();
        for row in rows {
            totals.add(row)?;
        }
        Ok(totals)
    }

    /// Returns one page of the filtered listing in the query's display order.
    ///
    /// # Errors
    ///
    /// Same as [`QueryService::filter`] and [`QueryService::totals`].
    pub fn page(
        state: &LedgerState,
        query: &TransactionQuery,
        request: PageRequest,
    ) -> Result<LedgerPage, LedgerError> {
        let mut rows = Self::filter(state, query)?;
        let totals = Self::totals(&rows)?;
        let total = rows.len() as u64;

        if query.order == SortOrder::Descending {
            rows.reverse();
        }

        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(request.limit()).unwrap_or(usize::MAX);
        let data: Vec<BalancedTransaction> = rows.into_iter().skip(offset).take(limit).collect();

        Ok(LedgerPage {
            rows: PageResponse::new(data, request.page, request.per_page, total),
            totals,
            balances: state.balances().clone(),
        })
    }
}
