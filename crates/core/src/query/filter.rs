//! Filters for cash register listings.

use cashbox_shared::types::Currency;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ledger::{LedgerError, Transaction};

/// Display order of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Oldest first.
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// Inclusive date range. Either end may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day included.
    pub from: Option<NaiveDate>,
    /// Last day included.
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range.
    #[must_use]
    pub const fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    /// Returns true if at least one end is set.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|from| date >= from) && self.to.is_none_or(|to| date <= to)
    }

    /// Rejects ranges that end before they start.
    pub fn validate(&self) -> Result<(), LedgerError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(LedgerError::InvalidDateRange { from, to }),
            _ => Ok(()),
        }
    }
}

/// Filter and order applied to the reconciled ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionQuery {
    /// Only movements in this currency.
    pub currency: Option<Currency>,
    /// Only movements inside this range.
    pub date_range: DateRange,
    /// Display order.
    pub order: SortOrder,
}

impl TransactionQuery {
    /// Creates a query matching everything, newest first.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one currency.
    #[must_use]
    pub const fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Restricts to a date range.
    #[must_use]
    pub const fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.date_range = DateRange::new(from, to);
        self
    }

    /// Sets the display order.
    #[must_use]
    pub const fn order(mut self, order: SortOrder) -> Self {
        self.order = order;
        self
    }

    /// Rejects inconsistent filters.
    pub fn validate(&self) -> Result<(), LedgerError> {
        self.date_range.validate()
    }

    /// Returns true if the movement passes every filter.
    #[must_use]
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.currency.is_none_or(|c| transaction.currency == c)
            && self.date_range.contains(transaction.date)
    }
}
