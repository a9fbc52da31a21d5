//! Cash register schema.
//!
//! Creates the movement table and the single-row exchange rate table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CASH_REGISTER_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS exchange_rate_settings CASCADE;
             DROP TABLE IF EXISTS cash_transactions CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const CASH_REGISTER_SQL: &str = r"
-- Cash register movements. Money columns are unconstrained NUMERIC.
CREATE TABLE cash_transactions (
    id UUID PRIMARY KEY,
    sequence BIGSERIAL NOT NULL UNIQUE,
    transaction_date DATE NOT NULL,
    concept TEXT NOT NULL,
    currency VARCHAR(16) NOT NULL,
    entry NUMERIC NOT NULL DEFAULT 0,
    exit NUMERIC NOT NULL DEFAULT 0,
    rate_at_creation NUMERIC NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_cash_currency CHECK (currency IN ('foreign', 'local')),
    CONSTRAINT chk_cash_concept CHECK (length(trim(concept)) > 0),
    CONSTRAINT chk_cash_non_negative CHECK (entry >= 0 AND exit >= 0),
    CONSTRAINT chk_cash_single_side CHECK ((entry = 0) <> (exit = 0)),
    CONSTRAINT chk_cash_rate_positive CHECK (rate_at_creation > 0)
);

-- Replay order
CREATE INDEX idx_cash_transactions_order ON cash_transactions(transaction_date, sequence);

-- Current exchange rate, local units per one foreign unit
CREATE TABLE exchange_rate_settings (
    id SMALLINT PRIMARY KEY DEFAULT 1,
    rate NUMERIC NOT NULL,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_rate_single_row CHECK (id = 1),
    CONSTRAINT chk_rate_positive CHECK (rate > 0)
);
";
