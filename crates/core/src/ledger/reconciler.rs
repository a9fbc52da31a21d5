//! Applies mutations through the store and keeps the ledger state reconciled.
//!
//! Every mutation follows the same steps: validate, replay the candidate
//! history, persist, then reload the full history and replay it. The new
//! state is adopted wholesale. A candidate that does not replay never reaches
//! the store, and any failure leaves the previous state untouched.

use std::sync::Arc;

use cashbox_shared::types::TransactionId;
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use super::engine::{LedgerEngine, LedgerState};
use super::error::{LedgerError, Operation};
use super::types::{
    BalancedTransaction, NewTransaction, PersistTransaction, Transaction, TransactionPatch,
};
use super::validation::{shift_date, validate_movement, validate_rate, validate_shift_offset};
use crate::currency::ExchangeRate;
use crate::store::{ExchangeRateProvider, TransactionStore};

/// Single-writer owner of the reconciled ledger.
pub struct BalanceReconciler<S, R> {
    store: Arc<S>,
    rates: Arc<R>,
    default_rate: Option<Decimal>,
    state: LedgerState,
}

impl<S, R> BalanceReconciler<S, R>
where
    S: TransactionStore,
    R: ExchangeRateProvider,
{
    /// Creates a reconciler with an empty state. Call [`Self::refresh`] to
    /// load the stored history.
    pub fn new(store: Arc<S>, rates: Arc<R>) -> Self {
        Self {
            store,
            rates,
            default_rate: None,
            state: LedgerState::default(),
        }
    }

    /// Rate stored on first use if the provider has none.
    #[must_use]
    pub fn with_default_rate(mut self, rate: Option<Decimal>) -> Self {
        self.default_rate = rate;
        self
    }

    /// The last reconciled state.
    pub fn state(&self) -> &LedgerState {
        &self.state
    }

    /// Reloads the full history from the store and replays it.
    pub async fn refresh(&mut self) -> Result<&LedgerState, LedgerError> {
        self.reload()
            .await
            .inspect_err(|err| warn!(error = %err.describe(Operation::Refresh), "refresh failed"))?;
        Ok(&self.state)
    }

    /// Returns the current exchange rate, seeding the configured default if
    /// none was ever stored.
    pub async fn current_rate(&self) -> Result<ExchangeRate, LedgerError> {
        let stored = self
            .rates
            .get()
            .await
            .map_err(|e| LedgerError::external("get rate", e))?;
        if let Some(rate) = stored {
            return Ok(rate);
        }

        let Some(default) = self.default_rate else {
            return Err(LedgerError::MissingRate);
        };
        let rate = validate_rate(default)?;
        let seeded = self
            .rates
            .set(rate)
            .await
            .map_err(|e| LedgerError::external("set rate", e))?;
        info!(rate = %seeded.rate, "seeded exchange rate from configuration");
        Ok(seeded)
    }

    /// Replaces the current exchange rate.
    ///
    /// Stored movements keep the rate captured at creation.
    pub async fn set_rate(&self, rate: Decimal) -> Result<ExchangeRate, LedgerError> {
        let result = async {
            let rate = validate_rate(rate)?;
            self.rates
                .set(rate)
                .await
                .map_err(|e| LedgerError::external("set rate", e))
        }
        .await;

        match &result {
            Ok(updated) => info!(rate = %updated.rate, "exchange rate updated"),
            Err(err) => warn!(error = %err.describe(Operation::SetRate), "rate update rejected"),
        }
        result
    }

    /// Registers a movement and returns it with its running balance.
    pub async fn apply_insert(
        &mut self,
        input: NewTransaction,
    ) -> Result<BalancedTransaction, LedgerError> {
        let result = self.insert(input).await;
        if let Err(err) = &result {
            warn!(error = %err.describe(Operation::RegisterMovement), "movement rejected");
        }
        result
    }

    async fn insert(&mut self, input: NewTransaction) -> Result<BalancedTransaction, LedgerError> {
        let side = validate_movement(&input.concept, input.entry, input.exit)?;
        let rate_at_creation = match input.rate {
            Some(rate) => validate_rate(rate)?,
            None => self.current_rate().await?.rate,
        };

        let row = PersistTransaction {
            date: input.date,
            concept: input.concept.trim().to_string(),
            currency: input.currency,
            entry: input.entry,
            exit: input.exit,
            rate_at_creation,
        };

        let mut candidate = self.history().await?;
        let sequence = candidate.iter().map(|tx| tx.sequence).max().unwrap_or(0) + 1;
        let now = Utc::now();
        candidate.push(Transaction {
            id: TransactionId::new(),
            sequence,
            date: row.date,
            concept: row.concept.clone(),
            currency: row.currency,
            entry: row.entry,
            exit: row.exit,
            rate_at_creation: row.rate_at_creation,
            created_at: now,
            updated_at: now,
        });
        LedgerEngine::replay(&candidate)?;

        let created = self
            .store
            .create(row)
            .await
            .map_err(|e| LedgerError::external("create", e))?;

        self.reload().await?;
        info!(
            id = %created.id,
            currency = %created.currency,
            %side,
            amount = %created.amount(),
            "movement registered"
        );
        self.reconciled_row(created.id)
    }

    /// Edits a movement. The captured rate never changes.
    pub async fn apply_edit(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<BalancedTransaction, LedgerError> {
        let result = self.edit(id, patch).await;
        if let Err(err) = &result {
            warn!(%id, error = %err.describe(Operation::EditMovement), "edit rejected");
        }
        result
    }

    async fn edit(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<BalancedTransaction, LedgerError> {
        let mut candidate = self.history().await?;
        let current = candidate
            .iter_mut()
            .find(|tx| tx.id == id)
            .ok_or(LedgerError::NotFound(id))?;

        let mut changes = patch.merge(current);
        validate_movement(&changes.concept, changes.entry, changes.exit)?;
        changes.concept = changes.concept.trim().to_string();

        changes.apply_to(current);
        LedgerEngine::replay(&candidate)?;

        self.store
            .update(id, changes)
            .await
            .map_err(|e| LedgerError::external("update", e))?
            .ok_or(LedgerError::NotFound(id))?;

        self.reload().await?;
        info!(%id, "movement edited");
        self.reconciled_row(id)
    }

    /// Deletes a movement.
    pub async fn apply_delete(&mut self, id: TransactionId) -> Result<(), LedgerError> {
        let result = self.delete(id).await;
        if let Err(err) = &result {
            warn!(%id, error = %err.describe(Operation::DeleteMovement), "delete rejected");
        }
        result
    }

    async fn delete(&mut self, id: TransactionId) -> Result<(), LedgerError> {
        let mut candidate = self.history().await?;
        let before = candidate.len();
        candidate.retain(|tx| tx.id != id);
        if candidate.len() == before {
            return Err(LedgerError::NotFound(id));
        }
        LedgerEngine::replay(&candidate)?;

        let removed = self
            .store
            .delete(id)
            .await
            .map_err(|e| LedgerError::external("delete", e))?;
        if !removed {
            return Err(LedgerError::NotFound(id));
        }

        self.reload().await?;
        info!(%id, "movement deleted");
        Ok(())
    }

    /// Shifts every movement's date by `offset_days` and returns how many
    /// movements moved.
    ///
    /// Confirming the operation with the user is the caller's job.
    pub async fn apply_date_shift(&mut self, offset_days: i64) -> Result<u64, LedgerError> {
        let result = self.date_shift(offset_days).await;
        if let Err(err) = &result {
            warn!(
                offset_days,
                error = %err.describe(Operation::DateCorrection),
                "date correction rejected"
            );
        }
        result
    }

    async fn date_shift(&mut self, offset_days: i64) -> Result<u64, LedgerError> {
        validate_shift_offset(offset_days)?;

        let mut candidate = self.history().await?;
        for transaction in &mut candidate {
            transaction.date = shift_date(transaction.date, offset_days)?;
        }
        LedgerEngine::replay(&candidate)?;

        let shifted = self
            .store
            .shift_dates(offset_days)
            .await
            .map_err(|e| LedgerError::external("shift dates", e))?;

        self.reload().await?;
        info!(offset_days, shifted, "date correction applied");
        Ok(shifted)
    }

    async fn history(&self) -> Result<Vec<Transaction>, LedgerError> {
        self.store
            .list_all()
            .await
            .map_err(|e| LedgerError::external("list", e))
    }

    async fn reload(&mut self) -> Result<(), LedgerError> {
        let history = self.history().await?;
        let state = LedgerEngine::replay(&history)?;
        debug!(rows = state.len(), "ledger replayed");
        self.state = state;
        Ok(())
    }

    fn reconciled_row(&self, id: TransactionId) -> Result<BalancedTransaction, LedgerError> {
        self.state.find(id).cloned().ok_or(LedgerError::NotFound(id))
    }
}
