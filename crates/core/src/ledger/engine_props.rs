//! Property-based tests for the replay engine.

use cashbox_shared::types::{Currency, TransactionId};
use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::engine::LedgerEngine;
use super::types::Transaction;
use crate::currency::CurrencyService;

/// (day offset, currency, is entry, amount in cents)
type Movement = (u32, Currency, bool, i64);

fn movement() -> impl Strategy<Value = Movement> {
    (
        0u32..10,
        prop_oneof![Just(Currency::Foreign), Just(Currency::Local)],
        any::<bool>(),
        1i64..10_000_000i64,
    )
}

fn history(max_len: usize) -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(movement(), 0..=max_len).prop_map(|movements| {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let now = Utc::now();
        movements
            .into_iter()
            .enumerate()
            .map(|(index, (offset, currency, is_entry, cents))| {
                let amount = Decimal::new(cents, 2);
                let sequence = i64::try_from(index).unwrap() + 1;
                Transaction {
                    id: TransactionId::new(),
                    sequence,
                    date: base + chrono::Days::new(u64::from(offset)),
                    concept: format!("movement {sequence}"),
                    currency,
                    entry: if is_entry { amount } else { Decimal::ZERO },
                    exit: if is_entry { Decimal::ZERO } else { amount },
                    rate_at_creation: Decimal::new(365, 1),
                    created_at: now,
                    updated_at: now,
                }
            })
            .collect()
    })
}

fn shuffled_history(max_len: usize) -> impl Strategy<Value = (Vec<Transaction>, Vec<Transaction>)> {
    history(max_len).prop_flat_map(|original| {
        let shuffled = Just(original.clone()).prop_shuffle();
        (Just(original), shuffled)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Replaying the output of a replay yields the same rows.
    #[test]
    fn prop_recompute_is_idempotent(transactions in history(30)) {
        let first = LedgerEngine::recompute_balances(&transactions).unwrap();
        let replayed: Vec<Transaction> = first.iter().map(|row| row.transaction.clone()).collect();
        let second = LedgerEngine::recompute_balances(&replayed).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Input order does not matter as long as sequences are kept.
    #[test]
    fn prop_input_order_irrelevant((original, shuffled) in shuffled_history(30)) {
        let a = LedgerEngine::replay(&original).unwrap();
        let b = LedgerEngine::replay(&shuffled).unwrap();
        prop_assert_eq!(a.rows(), b.rows());
        prop_assert_eq!(a.balances(), b.balances());

        let rate = Decimal::new(365, 1);
        for reference in Currency::ALL {
            prop_assert_eq!(
                CurrencyService::consolidated_value(a.balances(), rate, reference).unwrap(),
                CurrencyService::consolidated_value(b.balances(), rate, reference).unwrap()
            );
        }
    }

    /// Each currency's closing balance is the sum of its net changes.
    #[test]
    fn prop_closing_balance_equals_net_sum(transactions in history(30)) {
        let state = LedgerEngine::replay(&transactions).unwrap();
        for currency in Currency::ALL {
            let expected: Decimal = transactions
                .iter()
                .filter(|tx| tx.currency == currency)
                .map(|tx| tx.net_change().unwrap())
                .sum();
            prop_assert_eq!(state.balances().get(currency), expected);
        }
    }

    /// Output rows are in (date, sequence) order.
    #[test]
    fn prop_rows_in_replay_order(transactions in history(30)) {
        let rows = LedgerEngine::recompute_balances(&transactions).unwrap();
        for pair in rows.windows(2) {
            prop_assert!(pair[0].transaction.ordering_key() < pair[1].transaction.ordering_key());
        }
    }
}
