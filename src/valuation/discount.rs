//! Present value of dated cashflows at a flat annual yield

use chrono::NaiveDate;

use crate::calendar::{year_fraction, DayCountConvention};
use crate::error::{PricingError, PricingResult};

/// Discount factor for `t` years at `annual_yield`, annually compounded
pub fn discount_factor(annual_yield: f64, t: f64) -> f64 {
    (1.0 + annual_yield).powf(-t)
}

/// Year fraction from `accrual_start` to each cashflow date
pub fn cashflow_times(
    dates: &[NaiveDate],
    accrual_start: NaiveDate,
    convention: DayCountConvention,
) -> PricingResult<Vec<f64>> {
    dates
        .iter()
        .map(|&date| year_fraction(accrual_start, date, convention))
        .collect()
}

/// Present value of `cashflows` paid on `dates`, discounted to `accrual_start`.
///
/// Each flow is discounted by `(1 + annual_yield)^-t` where `t` is its year
/// fraction under `convention`.
pub fn present_value(
    dates: &[NaiveDate],
    cashflows: &[f64],
    annual_yield: f64,
    convention: DayCountConvention,
    accrual_start: NaiveDate,
) -> PricingResult<f64> {
    check_lengths(dates, cashflows)?;
    let times = cashflow_times(dates, accrual_start, convention)?;
    Ok(pv_at_times(&times, cashflows, annual_yield))
}

/// Present value over precomputed year fractions
pub(crate) fn pv_at_times(times: &[f64], cashflows: &[f64], annual_yield: f64) -> f64 {
    times
        .iter()
        .zip(cashflows)
        .map(|(&t, &cf)| cf * discount_factor(annual_yield, t))
        .sum()
}

pub(crate) fn check_lengths(dates: &[NaiveDate], cashflows: &[f64]) -> PricingResult<()> {
    if dates.len() != cashflows.len() {
        return Err(PricingError::validation(
            "cashflows",
            format!("{} cashflows supplied for {} dates", cashflows.len(), dates.len()),
        ));
    }
    Ok(())
}
