//! Current exchange rate repository.
//!
//! The `exchange_rate_settings` table holds at most one row, keyed `id = 1`.

use cashbox_core::currency::ExchangeRate;
use cashbox_core::store::{ExchangeRateProvider, StoreError};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::debug;

use super::store_error;
use crate::entities::exchange_rate_settings;

const SETTINGS_ROW: i16 = 1;

/// Exchange rate repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct ExchangeRateRepository {
    db: DatabaseConnection,
}

impl ExchangeRateRepository {
    /// Creates a new exchange rate repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl ExchangeRateProvider for ExchangeRateRepository {
    async fn get(&self) -> Result<Option<ExchangeRate>, StoreError> {
        let model = exchange_rate_settings::Entity::find_by_id(SETTINGS_ROW)
            .one(&self.db)
            .await
            .map_err(store_error)?;

        Ok(model.map(to_domain))
    }

    async fn set(&self, rate: Decimal) -> Result<ExchangeRate, StoreError> {
        let row = exchange_rate_settings::ActiveModel {
            id: Set(SETTINGS_ROW),
            rate: Set(rate),
            updated_at: Set(Utc::now().into()),
        };

        let model = exchange_rate_settings::Entity::insert(row)
            .on_conflict(
                OnConflict::column(exchange_rate_settings::Column::Id)
                    .update_columns([
                        exchange_rate_settings::Column::Rate,
                        exchange_rate_settings::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(store_error)?;

        debug!(rate = %model.rate, "exchange rate stored");
        Ok(to_domain(model))
    }
}

fn to_domain(model: exchange_rate_settings::Model) -> ExchangeRate {
    ExchangeRate {
        rate: model.rate,
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
