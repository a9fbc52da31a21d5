//! Repository abstractions for data access.
//!
//! Repositories implement the store traits from `cashbox-core`, hiding the
//! `SeaORM` implementation details from the rest of the application.

pub mod exchange_rate;
pub mod transaction;

pub use exchange_rate::ExchangeRateRepository;
pub use transaction::TransactionRepository;

use cashbox_core::store::StoreError;
use sea_orm::DbErr;

/// Maps a database error onto the store taxonomy.
pub(crate) fn store_error(err: DbErr) -> StoreError {
    match err {
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => StoreError::Unavailable(err.to_string()),
        other => StoreError::backend(other),
    }
}
