//! Database seeder for Cashbox development and testing.
//!
//! Sets the exchange rate and registers a small sample ledger in both
//! currencies. Skips seeding if the register already holds movements.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use anyhow::Context;
use cashbox_core::ledger::{BalanceReconciler, NewTransaction};
use cashbox_core::query::{QueryService, TransactionQuery};
use cashbox_db::{ExchangeRateRepository, TransactionRepository, connect};
use cashbox_shared::AppConfig;
use cashbox_shared::types::Currency;
use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Rate set when the configuration does not provide a default.
const SEED_RATE: Decimal = Decimal::from_parts(3650, 0, 0, false, 2);

/// Sample movements as (days before today, concept, currency, signed amount in cents).
const SAMPLE_MOVEMENTS: [(u64, &str, Currency, i64); 8] = [
    (6, "Opening float", Currency::Foreign, 50_000),
    (6, "Opening float", Currency::Local, 200_000),
    (5, "Counter sales", Currency::Local, 145_050),
    (4, "Office supplies", Currency::Local, -32_075),
    (3, "Client payment", Currency::Foreign, 12_000),
    (2, "Courier", Currency::Foreign, -1_550),
    (1, "Counter sales", Currency::Local, 98_000),
    (0, "Cleaning service", Currency::Local, -45_000),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashbox=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    info!("Connecting to database...");
    let db = connect(&config.database).await?;

    let store = Arc::new(TransactionRepository::new(db.clone()));
    let rates = Arc::new(ExchangeRateRepository::new(db));
    let mut ledger =
        BalanceReconciler::new(store, rates).with_default_rate(config.ledger.default_rate);

    if !ledger.refresh().await?.is_empty() {
        info!("Cash register already has movements, skipping...");
        return Ok(());
    }

    info!("Seeding exchange rate...");
    ledger
        .set_rate(config.ledger.default_rate.unwrap_or(SEED_RATE))
        .await?;

    info!("Seeding movements...");
    let today = Utc::now().date_naive();
    for (days_ago, concept, currency, cents) in SAMPLE_MOVEMENTS {
        ledger.apply_insert(sample(today, days_ago, concept, currency, cents)?).await?;
    }

    let recent = QueryService::page(
        ledger.state(),
        &TransactionQuery::new(),
        config.pagination.first_page(),
    )?;
    for row in &recent.rows.data {
        info!(
            date = %row.transaction.date,
            concept = %row.transaction.concept,
            currency = config.ledger.labels().code(row.transaction.currency),
            balance = %row.balance,
            "recent movement"
        );
    }

    for balance in ledger.state().balances().iter() {
        info!(
            currency = config.ledger.labels().code(balance.currency),
            balance = %balance.amount,
            "closing balance"
        );
    }
    info!("Seeding complete!");
    Ok(())
}

fn sample(
    today: NaiveDate,
    days_ago: u64,
    concept: &str,
    currency: Currency,
    cents: i64,
) -> anyhow::Result<NewTransaction> {
    let date = today
        .checked_sub_days(Days::new(days_ago))
        .context("sample date out of range")?;
    let amount = Decimal::new(cents.abs(), 2);
    Ok(if cents < 0 {
        NewTransaction::exit(date, concept, currency, amount)
    } else {
        NewTransaction::entry(date, concept, currency, amount)
    })
}
