//! Calendar arithmetic and day-count fractions

mod dates;
mod daycount;

pub use dates::{add_days, add_months, days_between};
pub use daycount::{year_fraction, DayCountConvention};
