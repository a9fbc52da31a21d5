//! CSV export of the cash register.
//!
//! Layout: a block of `label,value` metadata rows, then the column header,
//! then one row per movement, oldest first. Money is written with 2 decimals
//! and rates with 4. The unused side of a movement is an empty cell.

use cashbox_shared::types::CurrencyLabels;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::error::ExportError;
use super::types::{
    EXPORT_COLUMNS, ExportArtifact, ExportMetadata, ExportRequest, ExportRow, REPORT_TITLE,
};
use crate::currency::{CurrencyService, MONEY_DECIMALS, RATE_DECIMALS};
use crate::ledger::validation::validate_rate;
use crate::ledger::{BalancedTransaction, LedgerError, MovementSide};
use crate::query::{DateRange, QueryService};

/// Builds export artifacts from a reconciled ledger.
pub struct ReportExporter;

impl ReportExporter {
    /// Renders the filtered ledger as a CSV artifact.
    ///
    /// # Errors
    ///
    /// - `InvalidRate` if the current rate is not positive
    /// - `InvalidDateRange` if the filter range is reversed
    /// - `Export(CorruptField)` if a stored movement cannot be rendered
    pub fn export(request: &ExportRequest<'_>) -> Result<ExportArtifact, LedgerError> {
        let rate = validate_rate(request.rate)?;
        let filtered = QueryService::filter(request.state, &request.query)?;
        let totals = QueryService::totals(&filtered)?;
        let balances = request.state.balances().clone();
        let consolidated =
            CurrencyService::consolidated_value(&balances, rate, request.reference)?;

        let rows = filtered
            .iter()
            .map(|row| Self::build_row(row, rate, &request.labels))
            .collect::<Result<Vec<_>, _>>()?;

        let metadata = ExportMetadata {
            title: REPORT_TITLE.to_string(),
            generated_at: request.generated_at,
            currency: request.query.currency,
            date_range: request.query.date_range,
            rate: CurrencyService::round_rate(rate),
            balances,
            reference: request.reference,
            consolidated: CurrencyService::round_money(consolidated),
            totals,
            row_count: rows.len(),
        };

        let content = Self::render(&metadata, &rows, &request.labels)?;
        let file_name = Self::file_name(
            &request.file_prefix,
            &request.query.date_range,
            request.generated_at,
        );

        info!(file_name = %file_name, rows = rows.len(), "export generated");
        Ok(ExportArtifact {
            file_name,
            metadata,
            rows,
            content,
        })
    }

    /// File name for an export.
    ///
    /// `<prefix>_<from>_<to>_<timestamp>.csv` when a date filter is active,
    /// with open ends written as `start` / `end`; `<prefix>_<timestamp>.csv`
    /// otherwise.
    #[must_use]
    pub fn file_name(prefix: &str, range: &DateRange, generated_at: DateTime<Utc>) -> String {
        let stamp = generated_at.format("%Y%m%dT%H%M%SZ");
        if !range.is_active() {
            return format!("{prefix}_{stamp}.csv");
        }

        let from = range
            .from
            .map_or_else(|| "start".to_string(), |d| d.to_string());
        let to = range.to.map_or_else(|| "end".to_string(), |d| d.to_string());
        format!("{prefix}_{from}_{to}_{stamp}.csv")
    }

    fn build_row(
        row: &BalancedTransaction,
        rate: Decimal,
        labels: &CurrencyLabels,
    ) -> Result<ExportRow, LedgerError> {
        let tx = &row.transaction;
        let side = tx.side().ok_or_else(|| ExportError::CorruptField {
            id: tx.id,
            field: "entry/exit",
            reason: format!("entry {} and exit {} break the single-side rule", tx.entry, tx.exit),
        })?;
        if tx.rate_at_creation <= Decimal::ZERO {
            return Err(ExportError::CorruptField {
                id: tx.id,
                field: "rate_at_creation",
                reason: format!("{} is not positive", tx.rate_at_creation),
            }
            .into());
        }

        let amount = CurrencyService::round_money(tx.amount());
        let equivalent = CurrencyService::equivalent(tx.amount(), tx.currency, rate)?;

        Ok(ExportRow {
            date: tx.date,
            concept: tx.concept.clone(),
            currency_code: labels.code(tx.currency).to_string(),
            entry: (side == MovementSide::Entry).then_some(amount),
            exit: (side == MovementSide::Exit).then_some(amount),
            equivalent: CurrencyService::round_money(equivalent),
            balance: CurrencyService::round_money(row.balance),
            rate: CurrencyService::round_rate(tx.rate_at_creation),
        })
    }

    fn render(
        metadata: &ExportMetadata,
        rows: &[ExportRow],
        labels: &CurrencyLabels,
    ) -> Result<String, ExportError> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());

        let currency = metadata
            .currency
            .map_or_else(|| "All".to_string(), |c| labels.code(c).to_string());
        let from = metadata.date_range.from.map(|d| d.to_string()).unwrap_or_default();
        let to = metadata.date_range.to.map(|d| d.to_string()).unwrap_or_default();

        writer.write_record(["Report", metadata.title.as_str()])?;
        writer.write_record([
            "Generated at".to_string(),
            metadata.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        ])?;
        writer.write_record(["Currency", currency.as_str()])?;
        writer.write_record(["From", from.as_str()])?;
        writer.write_record(["To", to.as_str()])?;
        writer.write_record(["Exchange rate".to_string(), rate_cell(metadata.rate)])?;
        for balance in metadata.balances.iter() {
            writer.write_record([
                format!("Balance {}", labels.code(balance.currency)),
                money_cell(balance.amount),
            ])?;
        }
        writer.write_record([
            format!("Consolidated {}", labels.code(metadata.reference)),
            money_cell(metadata.consolidated),
        ])?;
        for (currency, totals) in metadata.totals.iter() {
            let code = labels.code(currency);
            writer.write_record([format!("Total entries {code}"), money_cell(totals.entries)])?;
            writer.write_record([format!("Total exits {code}"), money_cell(totals.exits)])?;
        }
        writer.write_record(["Rows".to_string(), metadata.row_count.to_string()])?;

        writer.write_record(EXPORT_COLUMNS)?;
        for row in rows {
            writer.write_record([
                row.date.to_string(),
                row.concept.clone(),
                row.currency_code.clone(),
                row.entry.map(money_cell).unwrap_or_default(),
                row.exit.map(money_cell).unwrap_or_default(),
                money_cell(row.equivalent),
                money_cell(row.balance),
                rate_cell(row.rate),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Buffer(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| ExportError::Buffer(e.to_string()))
    }
}

fn money_cell(value: Decimal) -> String {
    fixed(CurrencyService::round_money(value), MONEY_DECIMALS)
}

fn rate_cell(value: Decimal) -> String {
    fixed(CurrencyService::round_rate(value), RATE_DECIMALS)
}

fn fixed(mut value: Decimal, scale: u32) -> String {
    if value.is_zero() {
        value = Decimal::ZERO;
    }
    value.rescale(scale);
    value.to_string()
}
