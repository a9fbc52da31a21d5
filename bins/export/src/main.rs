//! Cashbox CSV exporter.
//!
//! Reconciles the stored cash register and writes a CSV report of the
//! movements selected by the `export` configuration section. Exits with
//! the [`AppError::exit_code`] of the first failure.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use cashbox_core::ledger::{BalanceReconciler, LedgerError, Operation};
use cashbox_core::query::TransactionQuery;
use cashbox_core::reports::{ExportRequest, ReportExporter};
use cashbox_db::{ExchangeRateRepository, TransactionRepository, connect};
use cashbox_shared::{AppConfig, AppError, AppResult};
use chrono::Utc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cashbox=debug,sea_orm=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run().await {
        Ok(path) => {
            info!(path = %path.display(), "cash register exported");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(code = err.error_code(), error = %err, "export aborted");
            ExitCode::from(err.exit_code())
        }
    }
}

async fn run() -> AppResult<PathBuf> {
    let config = AppConfig::load()?;

    let db = connect(&config.database)
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;
    info!("Connected to database");

    let store = Arc::new(TransactionRepository::new(db.clone()));
    let rates = Arc::new(ExchangeRateRepository::new(db));
    let mut ledger =
        BalanceReconciler::new(store, rates).with_default_rate(config.ledger.default_rate);

    ledger
        .refresh()
        .await
        .map_err(|e| failed(e, Operation::Refresh))?;
    let rate = ledger
        .current_rate()
        .await
        .map_err(|e| failed(e, Operation::Export))?;

    let mut query = TransactionQuery::new().between(config.export.from, config.export.to);
    if let Some(currency) = config.export.currency {
        query = query.currency(currency);
    }

    let labels = config.ledger.labels();
    let artifact = ReportExporter::export(&ExportRequest {
        state: ledger.state(),
        query,
        rate: rate.rate,
        reference: config.ledger.reference_currency,
        labels: labels.clone(),
        file_prefix: config.export.file_prefix.clone(),
        generated_at: Utc::now(),
    })
    .map_err(|e| failed(e, Operation::Export))?;

    for (currency, totals) in artifact.metadata.totals.iter() {
        info!(
            currency = labels.code(currency),
            entries = %totals.entries,
            exits = %totals.exits,
            "filtered totals"
        );
    }

    let dir = Path::new(&config.export.output_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Export(format!("Failed to create {}: {e}", dir.display())))?;
    let path = dir.join(&artifact.file_name);
    tokio::fs::write(&path, artifact.content.as_bytes())
        .await
        .map_err(|e| AppError::Export(format!("Failed to write {}: {e}", path.display())))?;

    info!(
        rows = artifact.metadata.row_count,
        consolidated = %artifact.metadata.consolidated,
        "report written"
    );
    Ok(path)
}

/// Logs a ledger failure in operator terms and converts it for the exit code.
fn failed(err: LedgerError, operation: Operation) -> AppError {
    error!(code = err.error_code(), error = %err.describe(operation), "ledger operation failed");
    AppError::from(err)
}
