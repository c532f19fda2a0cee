//! Day-count conventions and year fractions

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::dates::days_between;
use crate::error::{PricingError, PricingResult};

/// Supported day-count conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// 30/360 with the day of month capped at 30 and no other month-end rule
    #[serde(rename = "30/360")]
    Thirty360,
    /// Actual days over 360
    #[serde(rename = "ACT/360")]
    Act360,
    /// Actual days over 365
    #[serde(rename = "ACT/365")]
    Act365,
}

impl DayCountConvention {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayCountConvention::Thirty360 => "30/360",
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365 => "ACT/365",
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DayCountConvention {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "30/360" => Ok(DayCountConvention::Thirty360),
            "ACT/360" => Ok(DayCountConvention::Act360),
            "ACT/365" => Ok(DayCountConvention::Act365),
            _ => Err(PricingError::UnsupportedConvention(s.to_string())),
        }
    }
}

/// Fraction of a year between two dates under `convention`.
///
/// Returns 0 for equal dates and fails with [`PricingError::Ordering`] when
/// `end` precedes `start`.
pub fn year_fraction(
    start: NaiveDate,
    end: NaiveDate,
    convention: DayCountConvention,
) -> PricingResult<f64> {
    if end < start {
        return Err(PricingError::Ordering { start, end });
    }
    if end == start {
        return Ok(0.0);
    }

    let fraction = match convention {
        DayCountConvention::Act365 => days_between(start, end) as f64 / 365.0,
        DayCountConvention::Act360 => days_between(start, end) as f64 / 360.0,
        DayCountConvention::Thirty360 => thirty_360_days(start, end) as f64 / 360.0,
    };
    Ok(fraction)
}

/// Day count numerator for 30/360
fn thirty_360_days(start: NaiveDate, end: NaiveDate) -> i64 {
    let years = end.year() as i64 - start.year() as i64;
    let months = end.month() as i64 - start.month() as i64;
    let d1 = start.day().min(30) as i64;
    let d2 = end.day().min(30) as i64;
    360 * years + 30 * months + (d2 - d1)
}
