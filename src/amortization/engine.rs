//! Core amortization engine for floating-rate loans

use log::debug;

use super::rows::AmortizationRow;
use super::state::AmortizationState;
use super::terms::{LoanTerms, PaymentRule};
use crate::calendar::year_fraction;
use crate::error::PricingResult;

/// Periodic rates below this magnitude are treated as zero
const ZERO_RATE_TOLERANCE: f64 = 1e-12;

/// Level payment that amortizes `balance` over `periods` at periodic rate `rate`.
///
/// Falls back to straight-line `balance / periods` when the rate is
/// negligible.
pub fn annuity_payment(balance: f64, rate: f64, periods: u32) -> f64 {
    let m = periods as f64;
    if rate.abs() < ZERO_RATE_TOLERANCE {
        balance / m
    } else {
        balance * rate / (1.0 - (1.0 + rate).powf(-m))
    }
}

/// Build the full amortization schedule for `terms`.
///
/// Fails without producing any rows if the terms are invalid.
pub fn build_schedule(terms: &LoanTerms) -> PricingResult<Vec<AmortizationRow>> {
    AmortizationEngine::new(terms).run()
}

/// Period-by-period amortization of one loan
pub struct AmortizationEngine<'a> {
    terms: &'a LoanTerms,
}

impl<'a> AmortizationEngine<'a> {
    pub fn new(terms: &'a LoanTerms) -> Self {
        Self { terms }
    }

    /// Validate the terms and amortize every period
    pub fn run(&self) -> PricingResult<Vec<AmortizationRow>> {
        self.terms.validate()?;

        let n = self.terms.periods();
        debug!(
            "building {} period schedule: principal {:.2}, rule {}, reset every {}, {} interest-only",
            n,
            self.terms.principal,
            self.terms.payment_rule.as_str(),
            self.terms.reset_cadence,
            self.terms.interest_only_periods,
        );

        let mut state = AmortizationState::from_terms(self.terms);
        let mut rows = Vec::with_capacity(n);

        for i in 0..n {
            state.period += 1;
            let row = self.calculate_period(i, &mut state)?;
            rows.push(row);
        }

        if let Some(last) = rows.last() {
            debug!(
                "schedule complete: total interest {:.2}, total principal {:.2}",
                last.cumulative_interest, last.cumulative_principal
            );
        }

        Ok(rows)
    }

    /// Amortize period `i` (0-based index into the dates) and advance the state
    fn calculate_period(&self, i: usize, state: &mut AmortizationState) -> PricingResult<AmortizationRow> {
        let terms = self.terms;
        let n = terms.periods() as u32;
        let period = state.period;

        let payment_date = terms.payment_dates[i];
        let day_count_fraction = year_fraction(state.accrual_start, payment_date, terms.day_count)?;

        let index_rate = terms.index_rates[i];
        let all_in_rate = terms.all_in_rate(index_rate);

        let beginning_balance = state.balance;
        let interest = beginning_balance * all_in_rate * day_count_fraction;

        let (scheduled_payment, payment_reset) =
            self.scheduled_payment(state, interest, all_in_rate * day_count_fraction);

        // The last period always retires the remaining balance
        let (payment, principal, payment_reset) = if period == n {
            (interest + beginning_balance, beginning_balance, false)
        } else {
            (scheduled_payment, scheduled_payment - interest, payment_reset)
        };
        let ending_balance = beginning_balance - principal;

        let row = AmortizationRow {
            period,
            accrual_start: state.accrual_start,
            payment_date,
            day_count_fraction,
            index_rate,
            spread: terms.spread,
            all_in_rate,
            beginning_balance,
            payment,
            interest,
            principal,
            ending_balance,
            cumulative_interest: state.cumulative_interest + interest,
            cumulative_principal: state.cumulative_principal + principal,
            negative_amortization: principal < 0.0,
            payment_reset,
        };

        state.advance(payment_date, interest, principal, ending_balance);
        Ok(row)
    }

    /// Payment due before the final-period payoff override.
    ///
    /// Returns the payment and whether a recast recomputed it this period.
    fn scheduled_payment(&self, state: &mut AmortizationState, interest: f64, periodic_rate: f64) -> (f64, bool) {
        let terms = self.terms;
        let period = state.period;
        let io = terms.interest_only_periods;

        if period <= io {
            return (interest, false);
        }

        match terms.payment_rule {
            PaymentRule::RecastOnReset => {
                let is_reset = (period - io - 1) % terms.reset_cadence == 0;
                match state.level_payment {
                    Some(payment) if !is_reset => (payment, false),
                    _ => {
                        let remaining = terms.periods() as u32 - period + 1;
                        let payment = annuity_payment(state.balance, periodic_rate, remaining);
                        state.level_payment = Some(payment);
                        (payment, true)
                    }
                }
            }
            // Presence checked by LoanTerms::validate
            PaymentRule::FixedPayment => (terms.fixed_payment.unwrap_or_default(), false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::DayCountConvention;
    use crate::error::PricingError;
    use crate::schedule::build_payment_dates;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn monthly_terms(periods: u32, rates: Vec<f64>) -> LoanTerms {
        let start = d(2026, 2, 1);
        LoanTerms {
            principal: 250_000.0,
            spread: 0.0,
            index_rates: rates,
            payment_dates: build_payment_dates(start, periods, 12).unwrap(),
            accrual_start: start,
            day_count: DayCountConvention::Thirty360,
            cap_rate: None,
            floor_rate: None,
            payment_rule: PaymentRule::RecastOnReset,
            reset_cadence: 1,
            interest_only_periods: 0,
            fixed_payment: None,
        }
    }

    fn varying_rates(n: usize) -> Vec<f64> {
        (0..n).map(|i| 0.04 + 0.0025 * (i % 7) as f64).collect()
    }

    #[test]
    fn test_annuity_payment() {
        // 100k over 360 months at 6% / 12
        assert_relative_eq!(annuity_payment(100_000.0, 0.005, 360), 599.55, epsilon = 0.01);
        assert_eq!(annuity_payment(1200.0, 0.0, 12), 100.0);
        assert_eq!(annuity_payment(1200.0, 1e-13, 12), 100.0);
    }

    #[test]
    fn test_schedule_fully_amortizes() {
        let mut terms = monthly_terms(60, varying_rates(60));
        terms.spread = 0.0175;
        terms.reset_cadence = 12;
        terms.interest_only_periods = 6;

        let rows = build_schedule(&terms).unwrap();
        assert_eq!(rows.len(), 60);
        assert_eq!(rows.last().unwrap().ending_balance, 0.0);

        let total_principal: f64 = rows.iter().map(|r| r.principal).sum();
        assert_abs_diff_eq!(total_principal, terms.principal, epsilon = 1e-6);

        assert_eq!(rows[0].beginning_balance, terms.principal);
        for pair in rows.windows(2) {
            assert_eq!(pair[1].beginning_balance, pair[0].ending_balance);
            assert_eq!(pair[1].accrual_start, pair[0].payment_date);
        }
        assert_eq!(rows[0].accrual_start, terms.accrual_start);
    }

    #[test]
    fn test_interest_only_window() {
        let mut terms = monthly_terms(24, vec![0.05; 24]);
        terms.interest_only_periods = 6;

        let rows = build_schedule(&terms).unwrap();
        for row in &rows[..6] {
            assert_eq!(row.payment, row.interest);
            assert_eq!(row.principal, 0.0);
            assert_eq!(row.ending_balance, terms.principal);
            assert!(!row.payment_reset);
        }
        assert!(rows[6].payment_reset);
        assert!(rows[6].principal > 0.0);
    }

    #[test]
    fn test_all_interest_only_pays_off_at_maturity() {
        let mut terms = monthly_terms(12, vec![0.05; 12]);
        terms.interest_only_periods = 12;

        let rows = build_schedule(&terms).unwrap();
        let last = rows.last().unwrap();
        assert_eq!(last.principal, terms.principal);
        assert_relative_eq!(last.payment, terms.principal + last.interest);
        assert_eq!(last.ending_balance, 0.0);
    }

    #[test]
    fn test_fixed_payment_matches_level_amortization() {
        let n = 36;
        let mut terms = monthly_terms(n, vec![0.06; n as usize]);
        terms.payment_rule = PaymentRule::FixedPayment;
        terms.fixed_payment = Some(annuity_payment(terms.principal, 0.06 / 12.0, n));

        let rows = build_schedule(&terms).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].principal > pair[0].principal);
            assert!(pair[1].interest < pair[0].interest);
        }
        assert_relative_eq!(rows[35].payment, rows[0].payment, epsilon = 1e-6);
        assert!(rows.iter().all(|r| !r.negative_amortization));
    }

    #[test]
    fn test_fixed_payment_below_interest_is_negative_amortization() {
        let mut terms = monthly_terms(12, vec![0.06; 12]);
        terms.payment_rule = PaymentRule::FixedPayment;
        terms.fixed_payment = Some(500.0); // interest is 1,250 per month

        let rows = build_schedule(&terms).unwrap();
        assert!(rows[0].negative_amortization);
        assert!(rows[0].ending_balance > rows[0].beginning_balance);
        assert!(rows[1].interest > rows[0].interest);

        let last = rows.last().unwrap();
        assert!(!last.negative_amortization);
        assert_eq!(last.ending_balance, 0.0);
    }

    #[test]
    fn test_recast_every_period() {
        let n = 24;
        let terms = monthly_terms(n, varying_rates(n as usize));

        let rows = build_schedule(&terms).unwrap();
        assert!(rows[..rows.len() - 1].iter().all(|r| r.payment_reset));
        // The payoff replaces the recast payment
        assert!(!rows[rows.len() - 1].payment_reset);

        for row in &rows[..rows.len() - 1] {
            let remaining = n - row.period + 1;
            let expected = annuity_payment(row.beginning_balance, row.all_in_rate * row.day_count_fraction, remaining);
            assert_relative_eq!(row.payment, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_recast_once_after_interest_only() {
        let n = 30;
        let io = 6;
        let mut terms = monthly_terms(n, varying_rates(n as usize));
        terms.interest_only_periods = io;
        terms.reset_cadence = n - io;

        let rows = build_schedule(&terms).unwrap();
        let resets: Vec<u32> = rows.iter().filter(|r| r.payment_reset).map(|r| r.period).collect();
        assert_eq!(resets, vec![io + 1]);

        let level = rows[io as usize].payment;
        for row in &rows[io as usize..rows.len() - 1] {
            assert_eq!(row.payment, level);
        }
    }

    #[test]
    fn test_recast_cadence_indexing_after_interest_only() {
        let mut terms = monthly_terms(20, varying_rates(20));
        terms.interest_only_periods = 2;
        terms.reset_cadence = 6;

        let rows = build_schedule(&terms).unwrap();
        let resets: Vec<u32> = rows.iter().filter(|r| r.payment_reset).map(|r| r.period).collect();
        assert_eq!(resets, vec![3, 9, 15]);
    }

    #[test]
    fn test_payoff_row_on_reset_period_is_not_a_reset() {
        // Cadence 6 over 19 periods lands a reset on the final period
        let mut terms = monthly_terms(19, varying_rates(19));
        terms.reset_cadence = 6;

        let rows = build_schedule(&terms).unwrap();
        let resets: Vec<u32> = rows.iter().filter(|r| r.payment_reset).map(|r| r.period).collect();
        assert_eq!(resets, vec![1, 7, 13]);

        let last = rows.last().unwrap();
        assert_relative_eq!(last.payment, last.beginning_balance + last.interest);
    }

    #[test]
    fn test_cap_and_floor_applied() {
        let mut terms = monthly_terms(4, vec![0.01, 0.03, 0.09, 0.05]);
        terms.spread = 0.02;
        terms.floor_rate = Some(0.04);
        terms.cap_rate = Some(0.08);

        let rows = build_schedule(&terms).unwrap();
        let rates: Vec<f64> = rows.iter().map(|r| r.all_in_rate).collect();
        assert_relative_eq!(rates[0], 0.04, epsilon = 1e-12);
        assert_relative_eq!(rates[1], 0.05, epsilon = 1e-12);
        assert_relative_eq!(rates[2], 0.08, epsilon = 1e-12);
        assert_relative_eq!(rates[3], 0.07, epsilon = 1e-12);
    }

    #[test]
    fn test_actual_day_count_interest() {
        let mut terms = monthly_terms(2, vec![0.05, 0.05]);
        terms.day_count = DayCountConvention::Act360;

        let rows = build_schedule(&terms).unwrap();
        // Feb 2026 has 28 days
        assert_relative_eq!(rows[0].day_count_fraction, 28.0 / 360.0);
        assert_relative_eq!(rows[0].interest, 250_000.0 * 0.05 * 28.0 / 360.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_terms_produce_no_rows() {
        let mut terms = monthly_terms(12, vec![0.05; 11]);
        assert!(matches!(build_schedule(&terms).unwrap_err(), PricingError::Validation { .. }));

        terms.index_rates.push(0.05);
        terms.principal = -1.0;
        assert!(matches!(build_schedule(&terms).unwrap_err(), PricingError::Validation { .. }));
    }

    #[test]
    fn test_payment_before_accrual_start_is_ordering_error() {
        let mut terms = monthly_terms(3, vec![0.05; 3]);
        terms.accrual_start = d(2026, 3, 15);
        assert!(matches!(build_schedule(&terms).unwrap_err(), PricingError::Ordering { .. }));
    }
}
