//! Report export error types.

use cashbox_shared::types::TransactionId;
use thiserror::Error;

/// Errors that can occur while producing an export artifact.
#[derive(Debug, Error)]
pub enum ExportError {
    /// A stored movement cannot be rendered.
    #[error("Movement {id} has a corrupt {field}: {reason}")]
    CorruptField {
        /// The offending movement.
        id: TransactionId,
        /// The field that failed.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The rendered buffer could not be finalized.
    #[error("Export buffer error: {0}")]
    Buffer(String),
}
