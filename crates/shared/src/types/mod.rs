//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::TransactionId;
pub use money::{Currency, CurrencyLabels, Money};
pub use pagination::{PageMeta, PageRequest, PageResponse};
