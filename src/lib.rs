//! Loan Pricer - amortization and valuation engine for floating-rate loans
//!
//! This library provides:
//! - Payment calendars and day-count fractions (30/360, ACT/360, ACT/365)
//! - Index-rate series normalization
//! - Amortization under index-plus-spread rates with caps, floors,
//!   interest-only periods, recast-on-reset and fixed-payment rules
//! - Present value, price and IRR of the resulting cashflows
//! - A parse-and-validate boundary for raw request parameters
//! - Parallel book and rate-shock pricing

pub mod error;
pub mod calendar;
pub mod schedule;
pub mod rates;
pub mod amortization;
pub mod valuation;
pub mod config;
pub mod request;
pub mod pricing;
pub mod scenario;

// Re-export commonly used types
pub use error::{PricingError, PricingResult};
pub use calendar::DayCountConvention;
pub use amortization::{build_schedule, AmortizationRow, LoanTerms, PaymentRule};
pub use valuation::{internal_rate_of_return, present_value, PricingMetrics, ValuationInputs};
pub use config::PricingConfig;
pub use request::{parse_request, PricingRequest, RawPricingRequest};
pub use pricing::{price_loan, price_raw, PricingOutcome};
pub use scenario::ScenarioRunner;
