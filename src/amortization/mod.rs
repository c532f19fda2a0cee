//! Amortization of floating-rate loans

mod engine;
mod rows;
mod state;
mod terms;

pub use engine::{annuity_payment, build_schedule, AmortizationEngine};
pub use rows::{AmortizationRow, ScheduleSummary};
pub use state::AmortizationState;
pub use terms::{LoanTerms, PaymentRule};
