//! Rental pricing and late fees.
//!
//! Charges are billed in whole hours: a rental costs the hourly rate times
//! the elapsed hours rounded up, never less than one hour. Late returns pay
//! the bike's late rate per started hour of delay.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

const SECS_PER_HOUR: i64 = 3600;

/// Number of billable hours between `start` and `expected_return`.
///
/// Fractional hours round up; anything at or below one hour (including a
/// return date not after the start) bills as a single hour.
#[must_use]
pub fn billable_hours(start: NaiveDateTime, expected_return: NaiveDateTime) -> i64 {
    let secs = (expected_return - start).num_seconds();
    hours_ceil(secs).max(1)
}

/// Total charge for a rental: `hourly_rate * ceil(max(1, hours))`.
#[must_use]
pub fn rental_total(
    hourly_rate: Decimal,
    start: NaiveDateTime,
    expected_return: NaiveDateTime,
) -> Decimal {
    hourly_rate * Decimal::from(billable_hours(start, expected_return))
}

/// Late fee for a return, if any.
///
/// Returns `None` when `actual_return` is at or before `expected_return`;
/// otherwise `late_rate * ceil(hours_late)`.
#[must_use]
pub fn late_fee(
    late_rate: Decimal,
    expected_return: NaiveDateTime,
    actual_return: NaiveDateTime,
) -> Option<Decimal> {
    let secs = (actual_return - expected_return).num_seconds();
    if secs <= 0 {
        return None;
    }
    Some(late_rate * Decimal::from(hours_ceil(secs)))
}

/// Ceiling division of seconds into hours. Non-positive inputs yield zero.
fn hours_ceil(secs: i64) -> i64 {
    if secs <= 0 {
        return 0;
    }
    (secs - 1) / SECS_PER_HOUR + 1
}
