//! Cash register movement repository.
//!
//! Implements [`TransactionStore`] over the `cash_transactions` table.

use std::str::FromStr;

use cashbox_core::ledger::{PersistTransaction, Transaction, TransactionChanges};
use cashbox_core::store::{StoreError, TransactionStore};
use cashbox_shared::types::{Currency, TransactionId};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbBackend, EntityTrait, NotSet,
    QueryOrder, Set, Statement,
};
use tracing::debug;

use super::store_error;
use crate::entities::cash_transactions;

const SHIFT_DATES_SQL: &str = "UPDATE cash_transactions \
     SET transaction_date = transaction_date + $1::integer, updated_at = now()";

/// Movement repository backed by Postgres.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl TransactionStore for TransactionRepository {
    async fn list_all(&self) -> Result<Vec<Transaction>, StoreError> {
        let models = cash_transactions::Entity::find()
            .order_by_asc(cash_transactions::Column::TransactionDate)
            .order_by_asc(cash_transactions::Column::Sequence)
            .all(&self.db)
            .await
            .map_err(store_error)?;

        models.into_iter().map(to_domain).collect()
    }

    async fn get(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        cash_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
            .map(to_domain)
            .transpose()
    }

    async fn create(&self, input: PersistTransaction) -> Result<Transaction, StoreError> {
        let now = Utc::now().into();
        let model = cash_transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            sequence: NotSet,
            transaction_date: Set(input.date),
            concept: Set(input.concept),
            currency: Set(input.currency.as_str().to_string()),
            entry: Set(input.entry),
            exit: Set(input.exit),
            rate_at_creation: Set(input.rate_at_creation),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(store_error)?;

        debug!(id = %model.id, sequence = model.sequence, "cash transaction inserted");
        to_domain(model)
    }

    async fn update(
        &self,
        id: TransactionId,
        changes: TransactionChanges,
    ) -> Result<Option<Transaction>, StoreError> {
        let Some(existing) = cash_transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(store_error)?
        else {
            return Ok(None);
        };

        let mut active: cash_transactions::ActiveModel = existing.into();
        active.transaction_date = Set(changes.date);
        active.concept = Set(changes.concept);
        active.currency = Set(changes.currency.as_str().to_string());
        active.entry = Set(changes.entry);
        active.exit = Set(changes.exit);
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&self.db).await.map_err(store_error)?;
        to_domain(updated).map(Some)
    }

    async fn delete(&self, id: TransactionId) -> Result<bool, StoreError> {
        let result = cash_transactions::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(store_error)?;

        Ok(result.rows_affected > 0)
    }

    async fn shift_dates(&self, offset_days: i64) -> Result<u64, StoreError> {
        let offset = i32::try_from(offset_days).map_err(StoreError::backend)?;
        let result = self
            .db
            .execute(Statement::from_sql_and_values(
                DbBackend::Postgres,
                SHIFT_DATES_SQL,
                [offset.into()],
            ))
            .await
            .map_err(store_error)?;

        debug!(offset_days, rows = result.rows_affected(), "cash transaction dates shifted");
        Ok(result.rows_affected())
    }
}

fn to_domain(model: cash_transactions::Model) -> Result<Transaction, StoreError> {
    let currency = Currency::from_str(&model.currency)
        .map_err(|e| StoreError::Corrupt(format!("cash transaction {}: {e}", model.id)))?;

    Ok(Transaction {
        id: TransactionId::from_uuid(model.id),
        sequence: model.sequence,
        date: model.transaction_date,
        concept: model.concept,
        currency,
        entry: model.entry,
        exit: model.exit,
        rate_at_creation: model.rate_at_creation,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}
