//! Tests for the filter and paging layer.

use cashbox_shared::types::{Currency, PageRequest, TransactionId};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::ledger::{LedgerEngine, LedgerError, LedgerState, Transaction};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn tx(sequence: i64, d: u32, currency: Currency, entry: Decimal, exit: Decimal) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: TransactionId::new(),
        sequence,
        date: day(d),
        concept: format!("movement {sequence}"),
        currency,
        entry,
        exit,
        rate_at_creation: dec!(36.5),
        created_at: now,
        updated_at: now,
    }
}

/// Five movements across both currencies over five days.
fn state() -> LedgerState {
    LedgerEngine::replay(&[
        tx(1, 1, Currency::Foreign, dec!(100), Decimal::ZERO),
        tx(2, 2, Currency::Foreign, Decimal::ZERO, dec!(30)),
        tx(3, 3, Currency::Local, dec!(500), Decimal::ZERO),
        tx(4, 4, Currency::Local, Decimal::ZERO, dec!(120)),
        tx(5, 5, Currency::Foreign, dec!(10), Decimal::ZERO),
    ])
    .unwrap()
}

fn sequences(rows: &[crate::ledger::BalancedTransaction]) -> Vec<i64> {
    rows.iter().map(|row| row.transaction.sequence).collect()
}

#[test]
fn test_empty_query_returns_everything_ascending() {
    let rows = QueryService::filter(&state(), &TransactionQuery::new()).unwrap();
    assert_eq!(sequences(&rows), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_currency_filter_keeps_full_history_balances() {
    let query = TransactionQuery::new().currency(Currency::Foreign);
    let rows = QueryService::filter(&state(), &query).unwrap();
    assert_eq!(sequences(&rows), vec![1, 2, 5]);
    let balances: Vec<Decimal> = rows.iter().map(|row| row.balance).collect();
    assert_eq!(balances, vec![dec!(100), dec!(70), dec!(80)]);
}

#[test]
fn test_date_range_is_inclusive() {
    let query = TransactionQuery::new().between(Some(day(2)), Some(day(4)));
    let rows = QueryService::filter(&state(), &query).unwrap();
    assert_eq!(sequences(&rows), vec![2, 3, 4]);

    // Balances are not restarted at the start of the range.
    assert_eq!(rows[0].balance, dec!(70));
}

#[test]
fn test_open_ended_ranges() {
    let from_only = TransactionQuery::new().between(Some(day(4)), None);
    assert_eq!(sequences(&QueryService::filter(&state(), &from_only).unwrap()), vec![4, 5]);

    let to_only = TransactionQuery::new().between(None, Some(day(1)));
    assert_eq!(sequences(&QueryService::filter(&state(), &to_only).unwrap()), vec![1]);
}

#[test]
fn test_reversed_range_rejected() {
    let query = TransactionQuery::new().between(Some(day(5)), Some(day(1)));
    let err = QueryService::filter(&state(), &query).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidDateRange { .. }));
}

#[test]
fn test_totals_per_currency() {
    let rows = QueryService::filter(&state(), &TransactionQuery::new()).unwrap();
    let totals = QueryService::totals(&rows).unwrap();

    let foreign = totals.get(Currency::Foreign);
    assert_eq!(foreign.entries, dec!(110));
    assert_eq!(foreign.exits, dec!(30));
    assert_eq!(foreign.net(), dec!(80));

    let local = totals.get(Currency::Local);
    assert_eq!(local.net(), dec!(380));
}

#[test]
fn test_totals_of_nothing_are_zero() {
    let totals = QueryService::totals(&[]).unwrap();
    for (_, currency_totals) in totals.iter() {
        assert_eq!(currency_totals, CurrencyTotals::default());
    }
}

#[test]
fn test_page_defaults_to_newest_first() {
    let page =
        QueryService::page(&state(), &TransactionQuery::new(), PageRequest::new(1, 2)).unwrap();

    assert_eq!(sequences(&page.rows.data), vec![5, 4]);
    assert_eq!(page.rows.meta.total, 5);
    assert_eq!(page.rows.meta.total_pages, 3);
}

#[test]
fn test_page_ascending_and_last_page() {
    let query = TransactionQuery::new().order(SortOrder::Ascending);
    let page = QueryService::page(&state(), &query, PageRequest::new(3, 2)).unwrap();

    assert_eq!(sequences(&page.rows.data), vec![5]);
    assert_eq!(page.rows.meta.page, 3);
}

#[test]
fn test_page_past_end_is_empty() {
    let page =
        QueryService::page(&state(), &TransactionQuery::new(), PageRequest::new(9, 2)).unwrap();
    assert!(page.rows.data.is_empty());
    assert_eq!(page.rows.meta.total, 5);
}

#[test]
fn test_page_totals_cover_all_filtered_rows() {
    let query = TransactionQuery::new().currency(Currency::Local);
    let page = QueryService::page(&state(), &query, PageRequest::new(1, 1)).unwrap();

    assert_eq!(page.rows.data.len(), 1);
    assert_eq!(page.totals.get(Currency::Local).entries, dec!(500));
    assert_eq!(page.totals.get(Currency::Local).exits, dec!(120));
    assert_eq!(page.totals.get(Currency::Foreign), CurrencyTotals::default());

    // Snapshot always reflects the whole ledger.
    assert_eq!(page.balances.get(Currency::Foreign), dec!(80));
}
