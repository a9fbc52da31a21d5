//! Export request and artifact types.

use cashbox_shared::types::{Currency, CurrencyLabels};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{BalanceSnapshot, LedgerState};
use crate::query::{DateRange, MovementTotals, TransactionQuery};

/// Title written in the first metadata row.
pub const REPORT_TITLE: &str = "Cash Register";

/// Fixed column order of the movement table.
pub const EXPORT_COLUMNS: [&str; 8] = [
    "Date",
    "Concept",
    "Currency",
    "Entry",
    "Exit",
    "Equivalent",
    "Balance",
    "Rate",
];

/// Everything the exporter needs. The exporter never reads a clock or a
/// store, so the same request always produces the same bytes.
#[derive(Debug, Clone)]
pub struct ExportRequest<'a> {
    /// Reconciled ledger to export from.
    pub state: &'a LedgerState,
    /// Filter applied to the rows. Its display order is ignored.
    pub query: TransactionQuery,
    /// Current exchange rate used for every equivalent.
    pub rate: Decimal,
    /// Currency the consolidated valuation is expressed in.
    pub reference: Currency,
    /// Display codes of the currencies.
    pub labels: CurrencyLabels,
    /// File name prefix.
    pub file_prefix: String,
    /// Generation timestamp written into the header and file name.
    pub generated_at: DateTime<Utc>,
}

/// Header block of an export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportMetadata {
    /// Report title.
    pub title: String,
    /// Generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Currency filter, `None` for all currencies.
    pub currency: Option<Currency>,
    /// Date filter.
    pub date_range: DateRange,
    /// Current rate, rounded to 4 places.
    pub rate: Decimal,
    /// Full-history closing balances, unrounded.
    pub balances: BalanceSnapshot,
    /// Currency of the consolidated valuation.
    pub reference: Currency,
    /// Consolidated valuation, rounded to 2 places.
    pub consolidated: Decimal,
    /// Entry/exit totals of the exported rows.
    pub totals: MovementTotals,
    /// Number of exported rows.
    pub row_count: usize,
}

/// One rendered movement. Amounts are already rounded for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    /// Calendar day.
    pub date: NaiveDate,
    /// Description.
    pub concept: String,
    /// Currency display code.
    pub currency_code: String,
    /// Entry amount, `None` for exits.
    pub entry: Option<Decimal>,
    /// Exit amount, `None` for entries.
    pub exit: Option<Decimal>,
    /// Amount converted into the other currency at the current rate.
    pub equivalent: Decimal,
    /// Running balance from the full-history replay.
    pub balance: Decimal,
    /// Rate captured when the movement was registered.
    pub rate: Decimal,
}

/// A finished export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// Header block.
    pub metadata: ExportMetadata,
    /// Exported rows, oldest first.
    pub rows: Vec<ExportRow>,
    /// Rendered CSV document.
    pub content: String,
}
