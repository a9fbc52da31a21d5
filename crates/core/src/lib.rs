//! Core business logic for Cashbox.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Cash register movements, balance replay and reconciliation
//! - `currency` - Dual-currency conversion and valuation
//! - `store` - Persistence interfaces and in-memory implementations
//! - `query` - Filtering, totals and pagination
//! - `reports` - CSV export

pub mod currency;
pub mod ledger;
pub mod query;
pub mod reports;
pub mod store;
