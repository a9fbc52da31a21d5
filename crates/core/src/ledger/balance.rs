//! Running balance bookkeeping.
//!
//! Each currency keeps its own chain: the first movement starts from zero and
//! every later one starts where the previous one ended.

use std::collections::BTreeMap;

use cashbox_shared::types::{Currency, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Running balance position of one movement within its currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// 1-based position within the currency's chain.
    pub position: u64,
    /// Balance before this movement.
    pub previous_balance: Decimal,
    /// Balance after this movement.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Creates the running balance for the first movement of a currency.
    #[must_use]
    pub fn first_entry(balance_change: Decimal) -> Self {
        Self {
            position: 1,
            previous_balance: Decimal::ZERO,
            current_balance: balance_change,
        }
    }

    /// Creates the running balance for the movement following `previous`.
    ///
    /// `current_balance[N] = current_balance[N-1] + balance_change`
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Result<Self, LedgerError> {
        let current_balance = previous
            .current_balance
            .checked_add(balance_change)
            .ok_or(LedgerError::ArithmeticOverflow("accumulating the running balance"))?;

        Ok(Self {
            position: previous.position + 1,
            previous_balance: previous.current_balance,
            current_balance,
        })
    }

    /// Advances an optional chain: starts it if empty, extends it otherwise.
    pub fn advance(previous: Option<&Self>, balance_change: Decimal) -> Result<Self, LedgerError> {
        match previous {
            None => Ok(Self::first_entry(balance_change)),
            Some(previous) => Self::next_entry(previous, balance_change),
        }
    }
}

/// Closing balance of every currency.
///
/// Currencies that never saw a movement report zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    balances: BTreeMap<Currency, Decimal>,
}

impl BalanceSnapshot {
    /// Creates an all-zero snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the balance of a currency.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Decimal {
        self.balances.get(&currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Records the closing balance of a currency.
    pub fn set(&mut self, currency: Currency, balance: Decimal) {
        self.balances.insert(currency, balance);
    }

    /// Iterates every currency's balance in [`Currency::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = Money> + '_ {
        Currency::ALL
            .into_iter()
            .map(|currency| Money::new(self.get(currency), currency))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn balance_change_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn balance_changes_strategy(max_len: usize) -> impl Strategy<Value = Vec<Decimal>> {
        prop::collection::vec(balance_change_strategy(), 1..=max_len)
    }

    fn build_chain(changes: &[Decimal]) -> Vec<RunningBalance> {
        let mut chain: Vec<RunningBalance> = Vec::with_capacity(changes.len());
        for change in changes {
            let next = RunningBalance::advance(chain.last(), *change).unwrap();
            chain.push(next);
        }
        chain
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Each link starts where the previous one ended.
        #[test]
        fn prop_previous_equals_prior_current(
            changes in balance_changes_strategy(20),
        ) {
            let chain = build_chain(&changes);
            prop_assert_eq!(chain[0].previous_balance, Decimal::ZERO);
            for pair in chain.windows(2) {
                prop_assert_eq!(pair[1].previous_balance, pair[0].current_balance);
            }
        }

        /// The closing balance is the sum of all changes.
        #[test]
        fn prop_final_balance_equals_sum_of_changes(
            changes in balance_changes_strategy(20),
        ) {
            let chain = build_chain(&changes);
            let expected: Decimal = changes.iter().copied().sum();
            prop_assert_eq!(chain.last().unwrap().current_balance, expected);
        }

        /// Positions form the contiguous sequence 1..=N.
        #[test]
        fn prop_positions_contiguous(
            changes in balance_changes_strategy(20),
        ) {
            let positions: Vec<u64> = build_chain(&changes).iter().map(|rb| rb.position).collect();
            let expected: Vec<u64> = (1..=changes.len() as u64).collect();
            prop_assert_eq!(positions, expected);
        }

        /// A zero change keeps the balance.
        #[test]
        fn prop_zero_change_preserves_balance(
            initial_change in balance_change_strategy(),
        ) {
            let rb1 = RunningBalance::first_entry(initial_change);
            let rb2 = RunningBalance::next_entry(&rb1, Decimal::ZERO).unwrap();
            prop_assert_eq!(rb2.current_balance, rb1.current_balance);
        }
    }

    #[test]
    fn test_running_balance_chain() {
        let rb1 = RunningBalance::first_entry(dec!(100));
        assert_eq!(rb1.position, 1);
        assert_eq!(rb1.current_balance, dec!(100));

        let rb2 = RunningBalance::next_entry(&rb1, dec!(-30)).unwrap();
        assert_eq!(rb2.position, 2);
        assert_eq!(rb2.previous_balance, dec!(100));
        assert_eq!(rb2.current_balance, dec!(70));

        // Balances may go negative.
        let rb3 = RunningBalance::next_entry(&rb2, dec!(-120)).unwrap();
        assert_eq!(rb3.current_balance, dec!(-50));
    }

    #[test]
    fn test_running_balance_overflow() {
        let rb = RunningBalance::first_entry(Decimal::MAX);
        let err = RunningBalance::next_entry(&rb, Decimal::MAX).unwrap_err();
        assert!(matches!(err, LedgerError::ArithmeticOverflow(_)));
    }

    #[test]
    fn test_snapshot_defaults_to_zero() {
        let mut snapshot = BalanceSnapshot::new();
        assert_eq!(snapshot.get(Currency::Foreign), Decimal::ZERO);
        assert_eq!(snapshot.get(Currency::Local), Decimal::ZERO);

        snapshot.set(Currency::Local, dec!(500));
        let all: Vec<Money> = snapshot.iter().collect();
        assert_eq!(
            all,
            vec![
                Money::new(Decimal::ZERO, Currency::Foreign),
                Money::new(dec!(500), Currency::Local),
            ]
        );
    }
}
