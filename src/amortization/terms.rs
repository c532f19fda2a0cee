//! Loan terms consumed by the amortization engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::DayCountConvention;
use crate::error::{PricingError, PricingResult};
use crate::schedule::check_strictly_increasing;

/// How the scheduled payment is set once the interest-only window ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentRule {
    /// Level payment recomputed every `reset_cadence` periods
    RecastOnReset,
    /// Caller-supplied payment held for every amortizing period
    FixedPayment,
}

impl PaymentRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentRule::RecastOnReset => "recast_on_reset",
            PaymentRule::FixedPayment => "fixed_payment",
        }
    }
}

impl std::str::FromStr for PaymentRule {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recast_on_reset" | "recast" => Ok(PaymentRule::RecastOnReset),
            "fixed_payment" | "fixed" => Ok(PaymentRule::FixedPayment),
            other => Err(PricingError::validation(
                "payment_rule",
                format!("unknown rule '{}' (expected recast_on_reset or fixed_payment)", other),
            )),
        }
    }
}

/// Terms of a single floating-rate loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Amount disbursed at the accrual start
    pub principal: f64,

    /// Spread over the index (decimal, e.g. 0.0225)
    pub spread: f64,

    /// Index rate for each payment period
    pub index_rates: Vec<f64>,

    /// Payment date for each period
    pub payment_dates: Vec<NaiveDate>,

    /// Date interest starts accruing
    pub accrual_start: NaiveDate,

    pub day_count: DayCountConvention,

    /// Maximum all-in rate
    pub cap_rate: Option<f64>,

    /// Minimum all-in rate
    pub floor_rate: Option<f64>,

    pub payment_rule: PaymentRule,

    /// Periods between payment recasts
    pub reset_cadence: u32,

    /// Leading periods that pay interest only
    pub interest_only_periods: u32,

    /// Payment for the fixed-payment rule
    pub fixed_payment: Option<f64>,
}

impl LoanTerms {
    /// Number of payment periods
    pub fn periods(&self) -> usize {
        self.payment_dates.len()
    }

    /// Index plus spread, clamped to the floor and cap where set.
    ///
    /// The floor is applied before the cap, so a cap below the floor wins.
    pub fn all_in_rate(&self, index_rate: f64) -> f64 {
        let mut rate = index_rate + self.spread;
        if let Some(floor) = self.floor_rate {
            rate = rate.max(floor);
        }
        if let Some(cap) = self.cap_rate {
            rate = rate.min(cap);
        }
        rate
    }

    /// Check every precondition of schedule construction
    pub fn validate(&self) -> PricingResult<()> {
        if !(self.principal.is_finite() && self.principal > 0.0) {
            return Err(PricingError::validation(
                "principal",
                format!("must be positive, got {}", self.principal),
            ));
        }

        check_strictly_increasing(&self.payment_dates)?;

        if self.index_rates.len() != self.payment_dates.len() {
            return Err(PricingError::validation(
                "index_rates",
                format!(
                    "{} rates supplied for {} payment dates",
                    self.index_rates.len(),
                    self.payment_dates.len()
                ),
            ));
        }

        if let Some(pos) = self.index_rates.iter().position(|r| !r.is_finite()) {
            return Err(PricingError::validation(
                "index_rates",
                format!("rate for period {} is not a finite number", pos + 1),
            ));
        }

        for (field, value) in [
            ("spread", Some(self.spread)),
            ("cap_rate", self.cap_rate),
            ("floor_rate", self.floor_rate),
        ] {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(PricingError::validation(field, "must be a finite number"));
                }
            }
        }

        if self.payment_rule == PaymentRule::FixedPayment {
            match self.fixed_payment {
                Some(p) if p.is_finite() && p > 0.0 => {}
                Some(p) => {
                    return Err(PricingError::validation(
                        "fixed_payment",
                        format!("must be positive for the fixed_payment rule, got {}", p),
                    ))
                }
                None => {
                    return Err(PricingError::validation(
                        "fixed_payment",
                        "required for the fixed_payment rule",
                    ))
                }
            }
        }

        if self.reset_cadence == 0 {
            return Err(PricingError::validation("reset_cadence", "must be at least 1"));
        }

        if self.interest_only_periods as usize > self.periods() {
            return Err(PricingError::validation(
                "interest_only_periods",
                format!(
                    "{} exceeds the {} payment periods",
                    self.interest_only_periods,
                    self.periods()
                ),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn terms() -> LoanTerms {
        LoanTerms {
            principal: 1_000_000.0,
            spread: 0.02,
            index_rates: vec![0.04, 0.045, 0.05],
            payment_dates: vec![d(2025, 2, 1), d(2025, 3, 1), d(2025, 4, 1)],
            accrual_start: d(2025, 1, 1),
            day_count: DayCountConvention::Act360,
            cap_rate: None,
            floor_rate: None,
            payment_rule: PaymentRule::RecastOnReset,
            reset_cadence: 1,
            interest_only_periods: 0,
            fixed_payment: None,
        }
    }

    fn field_of(err: PricingError) -> String {
        match err {
            PricingError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_terms() {
        assert!(terms().validate().is_ok());
    }

    #[test]
    fn test_all_in_rate_clamps() {
        let mut t = terms();
        assert!((t.all_in_rate(0.03) - 0.05).abs() < 1e-15);

        t.cap_rate = Some(0.06);
        t.floor_rate = Some(0.045);
        assert_eq!(t.all_in_rate(0.05), 0.06);
        assert_eq!(t.all_in_rate(0.01), 0.045);
        assert!((t.all_in_rate(0.03) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn test_rejects_bad_principal() {
        let mut t = terms();
        t.principal = 0.0;
        assert_eq!(field_of(t.validate().unwrap_err()), "principal");
        t.principal = f64::NAN;
        assert_eq!(field_of(t.validate().unwrap_err()), "principal");
    }

    #[test]
    fn test_rejects_rate_count_mismatch() {
        let mut t = terms();
        t.index_rates.pop();
        assert_eq!(field_of(t.validate().unwrap_err()), "index_rates");
    }

    #[test]
    fn test_rejects_bad_dates() {
        let mut t = terms();
        t.payment_dates.clear();
        t.index_rates.clear();
        assert!(matches!(t.validate().unwrap_err(), PricingError::EmptySchedule));

        let mut t = terms();
        t.payment_dates.swap(0, 1);
        assert!(matches!(t.validate().unwrap_err(), PricingError::NonMonotonicSchedule { .. }));
    }

    #[test]
    fn test_fixed_rule_requires_positive_payment() {
        let mut t = terms();
        t.payment_rule = PaymentRule::FixedPayment;
        assert_eq!(field_of(t.validate().unwrap_err()), "fixed_payment");
        t.fixed_payment = Some(-5.0);
        assert_eq!(field_of(t.validate().unwrap_err()), "fixed_payment");
        t.fixed_payment = Some(340_000.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_rejects_cadence_and_io_out_of_range() {
        let mut t = terms();
        t.reset_cadence = 0;
        assert_eq!(field_of(t.validate().unwrap_err()), "reset_cadence");

        let mut t = terms();
        t.interest_only_periods = 4;
        assert_eq!(field_of(t.validate().unwrap_err()), "interest_only_periods");
        t.interest_only_periods = 3;
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_parse_payment_rule() {
        assert_eq!("recast_on_reset".parse::<PaymentRule>().unwrap(), PaymentRule::RecastOnReset);
        assert_eq!("Fixed_Payment".parse::<PaymentRule>().unwrap(), PaymentRule::FixedPayment);
        assert!("balloon".parse::<PaymentRule>().is_err());
    }
}
