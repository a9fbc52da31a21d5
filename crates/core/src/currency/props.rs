//! Property-based tests for currency conversion.

use cashbox_shared::types::Currency;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::conversion::ConversionDirection;
use super::service::CurrencyService;
use crate::ledger::BalanceSnapshot;

/// Amounts from -1,000,000.00 to 1,000,000.00.
fn amount() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0.0001 to 10000.0000.
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (1i64..100_000_000i64).prop_map(|v| Decimal::new(v, 4))
}

fn non_positive_rate() -> impl Strategy<Value = Decimal> {
    (-100_000_000i64..=0i64).prop_map(|v| Decimal::new(v, 4))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Converting local to foreign and back lands on the original amount,
    /// up to the precision lost in the division.
    #[test]
    fn prop_round_trip_recovers_amount(
        amount in amount(),
        rate in positive_rate(),
    ) {
        let foreign =
            CurrencyService::convert(amount, ConversionDirection::LocalToForeign, rate).unwrap();
        let back =
            CurrencyService::convert(foreign, ConversionDirection::ForeignToLocal, rate).unwrap();
        let tolerance = Decimal::new(1, 8);
        prop_assert!(
            (back - amount).abs() <= tolerance,
            "round trip drifted: {} -> {} -> {}", amount, foreign, back
        );
    }

    /// Non-positive rates are always rejected.
    #[test]
    fn prop_non_positive_rate_rejected(
        amount in amount(),
        rate in non_positive_rate(),
    ) {
        for direction in [
            ConversionDirection::ForeignToLocal,
            ConversionDirection::LocalToForeign,
        ] {
            prop_assert!(CurrencyService::convert(amount, direction, rate).is_err());
        }
    }

    /// A snapshot holding only the reference currency is valued at its balance.
    #[test]
    fn prop_consolidated_reference_only(
        balance in amount(),
        rate in positive_rate(),
    ) {
        for reference in Currency::ALL {
            let mut snapshot = BalanceSnapshot::new();
            snapshot.set(reference, balance);
            let value = CurrencyService::consolidated_value(&snapshot, rate, reference).unwrap();
            prop_assert_eq!(value, balance);
        }
    }

    /// Rounded money never carries more than two decimals.
    #[test]
    fn prop_round_money_scale(
        amount in amount(),
        rate in positive_rate(),
    ) {
        let converted =
            CurrencyService::convert(amount, ConversionDirection::LocalToForeign, rate).unwrap();
        prop_assert!(CurrencyService::round_money(converted).scale() <= 2);
    }
}
