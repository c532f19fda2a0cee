//! Running state carried between amortization periods

use chrono::NaiveDate;

use super::terms::LoanTerms;

/// Balance and payment state of a loan between periods
#[derive(Debug, Clone)]
pub struct AmortizationState {
    /// Current period (1-indexed, 0 before the first period)
    pub period: u32,

    /// Accrual start of the current period
    pub accrual_start: NaiveDate,

    /// Balance at the start of the current period
    pub balance: f64,

    /// Level payment set by the most recent recast
    pub level_payment: Option<f64>,

    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
}

impl AmortizationState {
    /// Initialize state at the accrual start
    pub fn from_terms(terms: &LoanTerms) -> Self {
        Self {
            period: 0,
            accrual_start: terms.accrual_start,
            balance: terms.principal,
            level_payment: None,
            cumulative_interest: 0.0,
            cumulative_principal: 0.0,
        }
    }

    /// Close the current period and roll forward to the next.
    ///
    /// The next period accrues from this period's payment date.
    pub fn advance(&mut self, payment_date: NaiveDate, interest: f64, principal: f64, ending_balance: f64) {
        self.cumulative_interest += interest;
        self.cumulative_principal += principal;
        self.balance = ending_balance;
        self.accrual_start = payment_date;
    }
}
