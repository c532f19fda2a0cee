//! Payment calendar generation and sanitization
//!
//! Builds the ordered sequence of payment dates for a loan and repairs a
//! schedule whose first date does not fall after the accrual start.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::calendar::{add_days, add_months, days_between};
use crate::error::{PricingError, PricingResult};

/// Generate payment dates at `start + step, start + 2*step, ...`.
///
/// `step` is `12 / payments_per_year` months and the period count is
/// `ceil(term_months / step)`. Each date is offset from `start` directly, so
/// a month-end start does not drift after passing through February.
pub fn build_payment_dates(
    start: NaiveDate,
    term_months: u32,
    payments_per_year: i32,
) -> PricingResult<Vec<NaiveDate>> {
    let step = payment_step(payments_per_year)?;
    offset_dates(start, term_months.div_ceil(step), step, 1)
}

/// Generate payment dates at `first, first + step, first + 2*step, ...`.
///
/// Same period count as [`build_payment_dates`], anchored on an explicit
/// first payment date instead of the accrual start.
pub fn build_payment_dates_from_first(
    first: NaiveDate,
    term_months: u32,
    payments_per_year: i32,
) -> PricingResult<Vec<NaiveDate>> {
    let step = payment_step(payments_per_year)?;
    offset_dates(first, term_months.div_ceil(step), step, 0)
}

/// Months between payments; the frequency must divide a year evenly
fn payment_step(payments_per_year: i32) -> PricingResult<u32> {
    if payments_per_year <= 0 || 12 % payments_per_year != 0 {
        return Err(PricingError::InvalidFrequency(payments_per_year));
    }
    Ok((12 / payments_per_year) as u32)
}

/// `periods` dates at `anchor + (first_multiple + j) * step` months, j = 0..periods
fn offset_dates(anchor: NaiveDate, periods: u32, step: u32, first_multiple: u32) -> PricingResult<Vec<NaiveDate>> {
    (0..periods)
        .map(|j| {
            let offset = (j + first_multiple)
                .checked_mul(step)
                .and_then(|months| i32::try_from(months).ok())
                .ok_or_else(|| PricingError::DateOutOfRange(format!("payment {} after {}", j + 1, anchor)))?;
            add_months(anchor, offset)
        })
        .collect()
}

/// Non-fatal notice that payment dates were moved during sanitization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleWarning {
    /// Number of days every payment date was shifted forward
    pub shifted_days: i64,
    /// First payment date before the shift
    pub original_first_date: NaiveDate,
    /// First payment date after the shift
    pub adjusted_first_date: NaiveDate,
}

impl std::fmt::Display for ScheduleWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "first payment date {} was not after the accrual start; schedule shifted forward {} days to {}",
            self.original_first_date, self.shifted_days, self.adjusted_first_date
        )
    }
}

/// A validated payment schedule
#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedSchedule {
    pub dates: Vec<NaiveDate>,
    /// Present when the dates had to be shifted
    pub warning: Option<ScheduleWarning>,
}

/// Validate a payment schedule against its accrual start.
///
/// Fails on an empty or non-increasing schedule. When the first date is on or
/// before `accrual_start`, every date is shifted forward by
/// `days_between(first, accrual_start) + 1` days and a warning is returned
/// alongside the adjusted dates.
pub fn sanitize_schedule(
    accrual_start: NaiveDate,
    dates: &[NaiveDate],
) -> PricingResult<SanitizedSchedule> {
    check_strictly_increasing(dates)?;

    let first = dates[0];
    if first > accrual_start {
        return Ok(SanitizedSchedule {
            dates: dates.to_vec(),
            warning: None,
        });
    }

    let shift = days_between(first, accrual_start) + 1;
    let shifted = dates
        .iter()
        .map(|&date| add_days(date, shift))
        .collect::<PricingResult<Vec<_>>>()?;

    let warning = ScheduleWarning {
        shifted_days: shift,
        original_first_date: first,
        adjusted_first_date: shifted[0],
    };
    warn!("{}", warning);

    Ok(SanitizedSchedule {
        dates: shifted,
        warning: Some(warning),
    })
}

/// Reject empty schedules and any date that does not follow its predecessor
pub(crate) fn check_strictly_increasing(dates: &[NaiveDate]) -> PricingResult<()> {
    if dates.is_empty() {
        return Err(PricingError::EmptySchedule);
    }
    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(PricingError::NonMonotonicSchedule {
                period: i + 2,
                previous: pair[0],
                date: pair[1],
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_monthly_five_year_schedule() {
        let dates = build_payment_dates(d(2026, 2, 1), 60, 12).unwrap();
        assert_eq!(dates.len(), 60);
        assert_eq!(dates[0], d(2026, 3, 1));
        assert_eq!(*dates.last().unwrap(), d(2031, 2, 1));
    }

    #[test]
    fn test_partial_final_period_rounds_up() {
        // 13 months quarterly: ceil(13 / 3) = 5 payments
        let dates = build_payment_dates(d(2025, 1, 15), 13, 4).unwrap();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[4], d(2026, 4, 15));
    }

    #[test]
    fn test_month_end_start_does_not_drift() {
        let dates = build_payment_dates(d(2024, 1, 31), 4, 12).unwrap();
        assert_eq!(dates, vec![d(2024, 2, 29), d(2024, 3, 31), d(2024, 4, 30), d(2024, 5, 31)]);
    }

    #[test]
    fn test_month_end_first_payment_keeps_its_day() {
        let dates = build_payment_dates_from_first(d(2026, 3, 31), 3, 12).unwrap();
        assert_eq!(dates, vec![d(2026, 3, 31), d(2026, 4, 30), d(2026, 5, 31)]);

        let dates = build_payment_dates_from_first(d(2026, 1, 31), 12, 4).unwrap();
        assert_eq!(dates, vec![d(2026, 1, 31), d(2026, 4, 30), d(2026, 7, 31), d(2026, 10, 31)]);
    }

    #[test]
    fn test_first_payment_anchor_checks_frequency() {
        let err = build_payment_dates_from_first(d(2026, 3, 31), 12, 5).unwrap_err();
        assert!(matches!(err, PricingError::InvalidFrequency(5)));
        assert!(build_payment_dates_from_first(d(2026, 3, 31), 0, 12).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_frequencies() {
        for ppy in [0, -12, 5, 7, 24] {
            let err = build_payment_dates(d(2025, 1, 1), 12, ppy).unwrap_err();
            assert!(matches!(err, PricingError::InvalidFrequency(p) if p == ppy));
        }
        for ppy in [1, 2, 3, 4, 6, 12] {
            assert!(build_payment_dates(d(2025, 1, 1), 12, ppy).is_ok());
        }
    }

    #[test]
    fn test_sanitize_passes_valid_schedule_through() {
        let dates = vec![d(2025, 2, 1), d(2025, 3, 1)];
        let clean = sanitize_schedule(d(2025, 1, 1), &dates).unwrap();
        assert_eq!(clean.dates, dates);
        assert!(clean.warning.is_none());
    }

    #[test]
    fn test_sanitize_shifts_when_first_date_not_after_start() {
        let dates = vec![d(2024, 12, 20), d(2025, 1, 20)];
        let clean = sanitize_schedule(d(2025, 1, 1), &dates).unwrap();

        // 12 days from Dec 20 to Jan 1, plus one
        let warning = clean.warning.unwrap();
        assert_eq!(warning.shifted_days, 13);
        assert_eq!(clean.dates, vec![d(2025, 1, 2), d(2025, 2, 2)]);
        assert_eq!(warning.adjusted_first_date, d(2025, 1, 2));

        // First date equal to the accrual start moves one day
        let clean = sanitize_schedule(d(2025, 1, 1), &[d(2025, 1, 1)]).unwrap();
        assert_eq!(clean.dates, vec![d(2025, 1, 2)]);
    }

    #[test]
    fn test_sanitize_rejects_empty_and_non_monotonic() {
        assert!(matches!(
            sanitize_schedule(d(2025, 1, 1), &[]).unwrap_err(),
            PricingError::EmptySchedule
        ));

        let err = sanitize_schedule(d(2025, 1, 1), &[d(2025, 2, 1), d(2025, 3, 1), d(2025, 3, 1)]).unwrap_err();
        assert!(matches!(err, PricingError::NonMonotonicSchedule { period: 3, .. }));
    }
}
