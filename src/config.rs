//! Pricing defaults and their environment overrides
//!
//! Values here fill any field a pricing request leaves out. Environment
//! variables:
//!   LOAN_DISCOUNT_YIELD, LOAN_DEFAULT_INDEX_RATE, LOAN_DAY_COUNT,
//!   LOAN_VALUATION_DAY_COUNT, LOAN_PAYMENTS_PER_YEAR, LOAN_RESET_CADENCE,
//!   LOAN_PAYMENT_RULE, LOAN_UPFRONT_FEE

use std::env;
use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::amortization::PaymentRule;
use crate::calendar::DayCountConvention;

/// Defaults applied while parsing pricing requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Annual yield used for discounting
    pub discount_yield: f64,

    /// Index rate used when a request supplies no usable rates
    pub default_index_rate: f64,

    /// Accrual convention for the loan
    pub day_count: DayCountConvention,

    /// Discounting convention; `None` uses the loan's accrual convention
    pub valuation_day_count: Option<DayCountConvention>,

    pub payments_per_year: i32,

    /// Periods between payment recasts
    pub reset_cadence: u32,

    pub payment_rule: PaymentRule,

    /// Fee received by the lender at funding
    pub upfront_fee: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            discount_yield: 0.07,
            default_index_rate: 0.04,
            day_count: DayCountConvention::Thirty360,
            valuation_day_count: None,
            payments_per_year: 12,
            reset_cadence: 12, // annual recast on a monthly loan
            payment_rule: PaymentRule::RecastOnReset,
            upfront_fee: 0.0,
        }
    }
}

impl PricingConfig {
    /// Defaults overridden by any `LOAN_*` environment variables that parse
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            discount_yield: env_or("LOAN_DISCOUNT_YIELD", defaults.discount_yield),
            default_index_rate: env_or("LOAN_DEFAULT_INDEX_RATE", defaults.default_index_rate),
            day_count: env_or("LOAN_DAY_COUNT", defaults.day_count),
            valuation_day_count: env_parse("LOAN_VALUATION_DAY_COUNT").or(defaults.valuation_day_count),
            payments_per_year: env_or("LOAN_PAYMENTS_PER_YEAR", defaults.payments_per_year),
            reset_cadence: env_or("LOAN_RESET_CADENCE", defaults.reset_cadence),
            payment_rule: env_or("LOAN_PAYMENT_RULE", defaults.payment_rule),
            upfront_fee: env_or("LOAN_UPFRONT_FEE", defaults.upfront_fee),
        }
    }

    /// Convention used to discount cashflows
    pub fn valuation_convention(&self, loan_convention: DayCountConvention) -> DayCountConvention {
        self.valuation_day_count.unwrap_or(loan_convention)
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("ignoring unparsable {}={}", key, raw);
            None
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env_parse(key).unwrap_or(default)
}
