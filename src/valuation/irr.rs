//! Internal Rate of Return (IRR) calculation
//!
//! Solves for the annual yield at which the present value of a dated
//! cashflow set is zero.

use chrono::NaiveDate;
use log::{debug, warn};

use super::discount::{cashflow_times, check_lengths, pv_at_times};
use crate::calendar::DayCountConvention;
use crate::error::PricingResult;

/// Lower bound of the annual yield search bracket
pub const IRR_LOWER_BOUND: f64 = -0.99;

/// Upper bound of the annual yield search bracket
pub const IRR_UPPER_BOUND: f64 = 5.0;

/// Bisection iteration ceiling
pub const IRR_MAX_ITERATIONS: u32 = 120;

/// NPV magnitude accepted as a root
pub const IRR_TOLERANCE: f64 = 1e-10;

/// Calculate the annual IRR of dated cashflows by bisection.
///
/// # Returns
/// * `Ok(None)` - the cashflows have no sign change, or the NPV has the same
///   sign at both ends of the `[-0.99, 5.0]` bracket
/// * `Ok(Some(rate))` - the root, or the final bracket midpoint if
///   the iteration limit is reached first
///
/// Errors only come from the inputs themselves (length mismatch or a date
/// before `accrual_start`).
pub fn internal_rate_of_return(
    dates: &[NaiveDate],
    accrual_start: NaiveDate,
    cashflows: &[f64],
    convention: DayCountConvention,
) -> PricingResult<Option<f64>> {
    check_lengths(dates, cashflows)?;

    // An IRR needs both an outflow and an inflow
    let has_positive = cashflows.iter().any(|&cf| cf > 0.0);
    let has_negative = cashflows.iter().any(|&cf| cf < 0.0);
    if !has_positive || !has_negative {
        return Ok(None);
    }

    let times = cashflow_times(dates, accrual_start, convention)?;
    Ok(bisect(|rate| pv_at_times(&times, cashflows, rate)))
}

/// Bracketed bisection for a root of `npv` over the fixed yield bracket
fn bisect<F: Fn(f64) -> f64>(npv: F) -> Option<f64> {
    let mut low = IRR_LOWER_BOUND;
    let mut high = IRR_UPPER_BOUND;

    let mut npv_low = npv(low);
    let npv_high = npv(high);

    if npv_low.abs() < IRR_TOLERANCE {
        return Some(low);
    }
    if npv_high.abs() < IRR_TOLERANCE {
        return Some(high);
    }
    if npv_low.signum() == npv_high.signum() {
        warn!(
            "no IRR root in [{}, {}]: NPV {:.6} and {:.6} share a sign",
            low, high, npv_low, npv_high
        );
        return None;
    }

    for iteration in 1..=IRR_MAX_ITERATIONS {
        let mid = (low + high) / 2.0;
        let npv_mid = npv(mid);

        if npv_mid.abs() < IRR_TOLERANCE {
            debug!("IRR {:.10} found after {} iterations", mid, iteration);
            return Some(mid);
        }

        if npv_mid.signum() == npv_low.signum() {
            low = mid;
            npv_low = npv_mid;
        } else {
            high = mid;
        }
    }

    let estimate = (low + high) / 2.0;
    debug!(
        "IRR bisection hit {} iterations, returning bracket midpoint {:.10}",
        IRR_MAX_ITERATIONS, estimate
    );
    Some(estimate)
}
