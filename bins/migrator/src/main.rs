//! Database migration runner for Cashbox.
//!
//! Usage:
//!   migrator up      - Apply the cash register schema
//!   migrator down    - Roll back the last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations

use cashbox_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Reads DATABASE_URL and sets up its own tracing.
    cli::run_cli(Migrator).await;
}
