//! Schedule output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationRow {
    // Timing
    pub period: u32,
    pub accrual_start: NaiveDate,
    pub payment_date: NaiveDate,
    pub day_count_fraction: f64,

    // Rates
    pub index_rate: f64,
    pub spread: f64,
    pub all_in_rate: f64,

    // Balances and flows
    pub beginning_balance: f64,
    pub payment: f64,
    pub interest: f64,
    pub principal: f64,
    pub ending_balance: f64,

    // Running totals
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,

    /// Payment fell below accrued interest
    pub negative_amortization: bool,

    /// The payment shown is a freshly recomputed level payment; never set on
    /// the final payoff row
    pub payment_reset: bool,
}

/// Totals over a completed schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub periods: u32,
    pub total_payments: f64,
    pub total_interest: f64,
    pub total_principal: f64,
    pub negative_amortization_periods: u32,
    pub max_balance: f64,
    pub final_payment_date: Option<NaiveDate>,
}

impl ScheduleSummary {
    pub fn from_rows(rows: &[AmortizationRow]) -> Self {
        let total_payments: f64 = rows.iter().map(|r| r.payment).sum();
        let total_interest = rows.last().map(|r| r.cumulative_interest).unwrap_or(0.0);
        let total_principal = rows.last().map(|r| r.cumulative_principal).unwrap_or(0.0);
        let negative_amortization_periods =
            rows.iter().filter(|r| r.negative_amortization).count() as u32;
        let max_balance = rows
            .iter()
            .flat_map(|r| [r.beginning_balance, r.ending_balance])
            .fold(0.0, f64::max);

        Self {
            periods: rows.len() as u32,
            total_payments,
            total_interest,
            total_principal,
            negative_amortization_periods,
            max_balance,
            final_payment_date: rows.last().map(|r| r.payment_date),
        }
    }
}
