//! The process-wide exchange rate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Current exchange rate: local currency units per one foreign unit.
///
/// There is exactly one current rate. It has no expiry and changes only when
/// explicitly set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// Local units per one foreign unit. Always positive.
    pub rate: Decimal,
    /// When the rate was last set.
    pub updated_at: DateTime<Utc>,
}
