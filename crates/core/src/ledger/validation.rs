//! Business rule validation for cash register movements.
//!
//! Every check here runs before the store is called.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::MovementSide;

/// Validates the editable fields of a movement and returns the side it hits.
///
/// # Errors
///
/// - `EmptyConcept` if the concept is blank after trimming
/// - `InvalidAmount` if either amount is negative
/// - `BothSidesZero` / `BothSidesNonzero` if the single-side rule is broken
pub fn validate_movement(
    concept: &str,
    entry: Decimal,
    exit: Decimal,
) -> Result<MovementSide, LedgerError> {
    if concept.trim().is_empty() {
        return Err(LedgerError::EmptyConcept);
    }

    if entry.is_sign_negative() && !entry.is_zero() {
        return Err(LedgerError::InvalidAmount {
            side: MovementSide::Entry,
            amount: entry,
        });
    }

    if exit.is_sign_negative() && !exit.is_zero() {
        return Err(LedgerError::InvalidAmount {
            side: MovementSide::Exit,
            amount: exit,
        });
    }

    match (entry.is_zero(), exit.is_zero()) {
        (true, true) => Err(LedgerError::BothSidesZero),
        (false, false) => Err(LedgerError::BothSidesNonzero),
        (false, true) => Ok(MovementSide::Entry),
        (true, false) => Ok(MovementSide::Exit),
    }
}

/// Validates an exchange rate.
///
/// # Errors
///
/// Returns `InvalidRate` unless the rate is strictly positive.
pub fn validate_rate(rate: Decimal) -> Result<Decimal, LedgerError> {
    if rate > Decimal::ZERO {
        Ok(rate)
    } else {
        Err(LedgerError::InvalidRate(rate))
    }
}

/// Shifts a calendar day by a signed number of days.
///
/// # Errors
///
/// Returns `DateOutOfRange` if the result is not a representable date.
pub fn shift_date(date: NaiveDate, offset_days: i64) -> Result<NaiveDate, LedgerError> {
    let days = Days::new(offset_days.unsigned_abs());
    let shifted = if offset_days >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    };

    shifted.ok_or(LedgerError::DateOutOfRange { date, offset_days })
}

/// Narrows a date correction offset to the range stores accept.
///
/// No calendar date survives a shift this large, so the check holds even
/// for an empty history.
///
/// # Errors
///
/// Returns `OffsetOutOfRange` if the offset does not fit in an `i32`.
pub fn validate_shift_offset(offset_days: i64) -> Result<i32, LedgerError> {
    i32::try_from(offset_days).map_err(|_| LedgerError::OffsetOutOfRange(offset_days))
}
