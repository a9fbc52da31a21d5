//! Ledger error types for validation, lookup, store and export failures.
//!
//! Every variant belongs to one [`ErrorKind`]. Validation errors are always
//! raised before the store is touched, so they never leave partial state.

use cashbox_shared::AppError;
use cashbox_shared::types::TransactionId;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::MovementSide;
use crate::reports::ExportError;
use crate::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// An amount is negative.
    #[error("{side} amount cannot be negative, got {amount}")]
    InvalidAmount {
        /// The side carrying the bad amount.
        side: MovementSide,
        /// The rejected amount.
        amount: Decimal,
    },

    /// Neither side carries an amount.
    #[error("Movement must have either an entry or an exit amount")]
    BothSidesZero,

    /// Both sides carry an amount.
    #[error("Movement cannot have both an entry and an exit amount")]
    BothSidesNonzero,

    /// No rate was supplied and none has been set.
    #[error("No exchange rate has been set")]
    MissingRate,

    /// Exchange rate must be positive.
    #[error("Exchange rate must be positive, got {0}")]
    InvalidRate(Decimal),

    /// The concept is blank.
    #[error("Concept cannot be empty")]
    EmptyConcept,

    /// A date filter ends before it starts.
    #[error("Invalid date range: start {from} is after end {to}")]
    InvalidDateRange {
        /// Start date.
        from: NaiveDate,
        /// End date.
        to: NaiveDate,
    },

    /// A date correction would move a movement off the calendar.
    #[error("Shifting {date} by {offset_days} days is out of range")]
    DateOutOfRange {
        /// The date that cannot be shifted.
        date: NaiveDate,
        /// The requested offset.
        offset_days: i64,
    },

    /// A date correction offset is larger than any calendar span.
    #[error("Date offset of {0} days is out of range")]
    OffsetOutOfRange(i64),

    /// Decimal arithmetic overflowed.
    #[error("Arithmetic overflow while {0}")]
    ArithmeticOverflow(&'static str),

    // ========== Lookup Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    NotFound(TransactionId),

    // ========== External Errors ==========
    /// The store or rate provider failed. The cause is kept as the source.
    #[error("Store call `{operation}` failed: {source}")]
    External {
        /// The store call that failed.
        operation: &'static str,
        /// The underlying failure.
        #[source]
        source: StoreError,
    },

    // ========== Export Errors ==========
    /// The export artifact could not be produced.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Coarse classification of ledger errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input, rejected before persistence.
    Validation,
    /// Unknown transaction id.
    NotFound,
    /// Store or provider failure.
    ExternalFailure,
    /// Formatting failure while exporting.
    Export,
}

/// User-facing operations, used to phrase failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Insert a movement.
    RegisterMovement,
    /// Edit a movement.
    EditMovement,
    /// Delete a movement.
    DeleteMovement,
    /// Bulk date shift.
    DateCorrection,
    /// Change the current exchange rate.
    SetRate,
    /// Reload the ledger from the store.
    Refresh,
    /// Produce the export artifact.
    Export,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::RegisterMovement => "register movement",
            Self::EditMovement => "edit movement",
            Self::DeleteMovement => "delete movement",
            Self::DateCorrection => "apply date correction",
            Self::SetRate => "update exchange rate",
            Self::Refresh => "load cash register",
            Self::Export => "export cash register",
        };
        f.write_str(label)
    }
}

impl LedgerError {
    /// Wraps a store failure with the call that produced it.
    #[must_use]
    pub fn external(operation: &'static str, source: StoreError) -> Self {
        Self::External { operation, source }
    }

    /// Returns the error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount { .. }
            | Self::BothSidesZero
            | Self::BothSidesNonzero
            | Self::MissingRate
            | Self::InvalidRate(_)
            | Self::EmptyConcept
            | Self::InvalidDateRange { .. }
            | Self::DateOutOfRange { .. }
            | Self::OffsetOutOfRange(_)
            | Self::ArithmeticOverflow(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::External { .. } => ErrorKind::ExternalFailure,
            Self::Export(_) => ErrorKind::Export,
        }
    }

    /// Returns the stable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount { .. } => "INVALID_AMOUNT",
            Self::BothSidesZero => "BOTH_SIDES_ZERO",
            Self::BothSidesNonzero => "BOTH_SIDES_NONZERO",
            Self::MissingRate => "MISSING_RATE",
            Self::InvalidRate(_) => "INVALID_RATE",
            Self::EmptyConcept => "EMPTY_CONCEPT",
            Self::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
            Self::DateOutOfRange { .. } => "DATE_OUT_OF_RANGE",
            Self::OffsetOutOfRange(_) => "OFFSET_OUT_OF_RANGE",
            Self::ArithmeticOverflow(_) => "ARITHMETIC_OVERFLOW",
            Self::NotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::External { .. } => "EXTERNAL_FAILURE",
            Self::Export(_) => "EXPORT_ERROR",
        }
    }

    /// Human-readable message naming the operation that failed.
    #[must_use]
    pub fn describe(&self, operation: Operation) -> String {
        format!("Could not {operation}: {self}")
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::NotFound => Self::NotFound(message),
            ErrorKind::ExternalFailure => Self::ExternalService(message),
            ErrorKind::Export => Self::Export(message),
        }
    }
}
