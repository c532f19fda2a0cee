//! Valuation of loan cashflows: present value, IRR and price

mod discount;
mod irr;
mod metrics;

pub use discount::{cashflow_times, discount_factor, present_value};
pub use irr::{
    internal_rate_of_return, IRR_LOWER_BOUND, IRR_MAX_ITERATIONS, IRR_TOLERANCE, IRR_UPPER_BOUND,
};
pub use metrics::{price_schedule, CashflowVector, PricingMetrics, ValuationInputs};
