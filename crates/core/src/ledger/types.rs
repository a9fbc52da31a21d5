//! Cash register domain types.
//!
//! A movement is a single entry (money in) or exit (money out) in one
//! currency. Persisted movements carry a store-assigned `sequence` that breaks
//! ties between movements recorded on the same day.

use cashbox_shared::types::{Currency, TransactionId};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::LedgerError;

/// Which side of the register a movement hits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementSide {
    /// Money coming into the register.
    Entry,
    /// Money leaving the register.
    Exit,
}

impl std::fmt::Display for MovementSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => f.write_str("entry"),
            Self::Exit => f.write_str("exit"),
        }
    }
}

/// A persisted cash register movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Monotonic insertion counter assigned by the store.
    pub sequence: i64,
    /// Calendar day the movement belongs to.
    pub date: NaiveDate,
    /// Free-text description.
    pub concept: String,
    /// Currency the amounts are held in.
    pub currency: Currency,
    /// Amount received (zero for exits).
    pub entry: Decimal,
    /// Amount paid out (zero for entries).
    pub exit: Decimal,
    /// Exchange rate in force when the movement was registered. Audit only.
    pub rate_at_creation: Decimal,
    /// When the movement was registered.
    pub created_at: DateTime<Utc>,
    /// When the movement was last changed.
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Returns `entry - exit`, the effect on the running balance.
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if the difference cannot be represented.
    pub fn net_change(&self) -> Result<Decimal, LedgerError> {
        self.entry
            .checked_sub(self.exit)
            .ok_or(LedgerError::ArithmeticOverflow("computing a net change"))
    }

    /// Returns the side this movement hits, or `None` if the stored row
    /// breaks the single-side rule.
    #[must_use]
    pub fn side(&self) -> Option<MovementSide> {
        match (self.entry.is_zero(), self.exit.is_zero()) {
            (false, true) => Some(MovementSide::Entry),
            (true, false) => Some(MovementSide::Exit),
            _ => None,
        }
    }

    /// Returns the amount on the used side.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        if self.entry.is_zero() {
            self.exit
        } else {
            self.entry
        }
    }

    /// Key of the total replay order: date, then insertion order.
    #[must_use]
    pub fn ordering_key(&self) -> (NaiveDate, i64) {
        (self.date, self.sequence)
    }
}

/// A movement annotated with the running balance of its currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalancedTransaction {
    /// The movement.
    #[serde(flatten)]
    pub transaction: Transaction,
    /// Balance of the movement's currency after applying it.
    pub balance: Decimal,
}

/// Input for registering a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTransaction {
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Free-text description.
    pub concept: String,
    /// Currency of the amounts.
    pub currency: Currency,
    /// Amount received.
    pub entry: Decimal,
    /// Amount paid out.
    pub exit: Decimal,
    /// Rate to capture; the provider's current rate when `None`.
    pub rate: Option<Decimal>,
}

impl NewTransaction {
    /// Creates an entry movement.
    #[must_use]
    pub fn entry(
        date: NaiveDate,
        concept: impl Into<String>,
        currency: Currency,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            concept: concept.into(),
            currency,
            entry: amount,
            exit: Decimal::ZERO,
            rate: None,
        }
    }

    /// Creates an exit movement.
    #[must_use]
    pub fn exit(
        date: NaiveDate,
        concept: impl Into<String>,
        currency: Currency,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            concept: concept.into(),
            currency,
            entry: Decimal::ZERO,
            exit: amount,
            rate: None,
        }
    }

    /// Captures an explicit rate instead of the provider's current one.
    #[must_use]
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }
}

/// A validated movement ready to be handed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistTransaction {
    /// Calendar day of the movement.
    pub date: NaiveDate,
    /// Trimmed description.
    pub concept: String,
    /// Currency of the amounts.
    pub currency: Currency,
    /// Amount received.
    pub entry: Decimal,
    /// Amount paid out.
    pub exit: Decimal,
    /// Captured rate, always positive.
    pub rate_at_creation: Decimal,
}

/// Partial update of a movement. `None` leaves the field unchanged.
///
/// The captured rate is immutable and deliberately absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionPatch {
    /// New calendar day.
    pub date: Option<NaiveDate>,
    /// New description.
    pub concept: Option<String>,
    /// New currency.
    pub currency: Option<Currency>,
    /// New entry amount.
    pub entry: Option<Decimal>,
    /// New exit amount.
    pub exit: Option<Decimal>,
}

impl TransactionPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the movement to another day.
    #[must_use]
    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// Moves the movement to another currency.
    #[must_use]
    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    /// Turns the movement into an entry of `amount`.
    #[must_use]
    pub fn as_entry(mut self, amount: Decimal) -> Self {
        self.entry = Some(amount);
        self.exit = Some(Decimal::ZERO);
        self
    }

    /// Turns the movement into an exit of `amount`.
    #[must_use]
    pub fn as_exit(mut self, amount: Decimal) -> Self {
        self.entry = Some(Decimal::ZERO);
        self.exit = Some(amount);
        self
    }

    /// Merges the patch over a stored movement.
    #[must_use]
    pub fn merge(self, current: &Transaction) -> TransactionChanges {
        TransactionChanges {
            date: self.date.unwrap_or(current.date),
            concept: self.concept.unwrap_or_else(|| current.concept.clone()),
            currency: self.currency.unwrap_or(current.currency),
            entry: self.entry.unwrap_or(current.entry),
            exit: self.exit.unwrap_or(current.exit),
        }
    }
}

/// The full set of editable fields after merging a patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionChanges {
    /// Calendar day.
    pub date: NaiveDate,
    /// Description.
    pub concept: String,
    /// Currency.
    pub currency: Currency,
    /// Entry amount.
    pub entry: Decimal,
    /// Exit amount.
    pub exit: Decimal,
}

impl TransactionChanges {
    /// Writes the editable fields onto a movement, leaving id, sequence,
    /// captured rate and timestamps alone.
    pub fn apply_to(&self, transaction: &mut Transaction) {
        transaction.date = self.date;
        transaction.concept.clone_from(&self.concept);
        transaction.currency = self.currency;
        transaction.entry = self.entry;
        transaction.exit = self.exit;
    }
}
