//! Errors reported by store and rate provider implementations.

use thiserror::Error;

/// Failure of a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The backend returned data that cannot be mapped to domain types.
    #[error("Corrupt stored data: {0}")]
    Corrupt(String),

    /// Any other backend failure.
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// Wraps an arbitrary backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}
