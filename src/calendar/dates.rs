//! Plain calendar arithmetic on `NaiveDate`
//!
//! No business-day adjustment is applied anywhere: weekends and holidays are
//! ordinary dates.

use chrono::{Days, Months, NaiveDate};

use crate::error::{PricingError, PricingResult};

/// Shift a date by `n` calendar months (negative moves backwards).
///
/// The day of month is clamped to the last day of the target month, so
/// Jan 31 + 1 month is Feb 28 (or 29).
pub fn add_months(date: NaiveDate, n: i32) -> PricingResult<NaiveDate> {
    let shifted = if n >= 0 {
        date.checked_add_months(Months::new(n.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| PricingError::DateOutOfRange(format!("{} {:+} months", date, n)))
}

/// Shift a date by `n` calendar days (negative moves backwards)
pub fn add_days(date: NaiveDate, n: i64) -> PricingResult<NaiveDate> {
    let shifted = if n >= 0 {
        date.checked_add_days(Days::new(n.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(n.unsigned_abs()))
    };
    shifted.ok_or_else(|| PricingError::DateOutOfRange(format!("{} {:+} days", date, n)))
}

/// Signed number of days from `start` to `end`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}
