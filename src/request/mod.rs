//! Parse-and-validate boundary for raw pricing parameters
//!
//! Callers hand over loosely typed text (query parameters, JSON bodies, CSV
//! rows). Everything is parsed and checked here, so the engine only ever sees
//! a well-formed [`LoanTerms`].

pub mod loader;

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{LoanTerms, PaymentRule};
use crate::calendar::DayCountConvention;
use crate::config::PricingConfig;
use crate::error::{PricingError, PricingResult};
use crate::rates::{normalize_rate_series, parse_rate_tokens};
use crate::schedule::{build_payment_dates, build_payment_dates_from_first, sanitize_schedule, ScheduleWarning};
use crate::valuation::ValuationInputs;

pub use loader::{load_requests, load_requests_from_reader};

/// Unvalidated pricing parameters, every field as optional text
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPricingRequest {
    pub loan_id: Option<String>,
    pub principal: Option<String>,
    pub spread: Option<String>,
    /// Rates separated by commas, semicolons or whitespace
    pub index_rates: Option<String>,
    pub start_date: Option<String>,
    /// Overrides the first payment date; later dates follow at the payment step
    pub first_payment_date: Option<String>,
    pub term_months: Option<String>,
    pub payments_per_year: Option<String>,
    pub day_count: Option<String>,
    pub valuation_day_count: Option<String>,
    pub cap_rate: Option<String>,
    pub floor_rate: Option<String>,
    pub payment_rule: Option<String>,
    pub reset_cadence: Option<String>,
    pub interest_only_periods: Option<String>,
    pub fixed_payment: Option<String>,
    pub discount_yield: Option<String>,
    pub upfront_fee: Option<String>,
}

impl RawPricingRequest {
    /// Build from key/value pairs such as decoded query parameters.
    ///
    /// Unknown keys are ignored; a repeated key keeps its last value.
    pub fn from_params<'a, I>(params: I) -> PricingResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let map: serde_json::Map<String, serde_json::Value> = params
            .into_iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        Ok(serde_json::from_value(serde_json::Value::Object(map))?)
    }

    /// Parse a JSON object whose values are all strings
    pub fn from_json(json: &str) -> PricingResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A validated request, ready for pricing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    pub loan_id: Option<String>,
    pub terms: LoanTerms,
    pub valuation: ValuationInputs,
    /// Set when the payment dates were shifted during sanitization
    pub schedule_warning: Option<ScheduleWarning>,
}

/// Parse and validate raw parameters, filling gaps from `config`
pub fn parse_request(raw: &RawPricingRequest, config: &PricingConfig) -> PricingResult<PricingRequest> {
    let principal: f64 = required("principal", &raw.principal)?;
    let accrual_start: NaiveDate = required("start_date", &raw.start_date)?;
    let term_months: u32 = required("term_months", &raw.term_months)?;
    let payments_per_year: i32 = optional("payments_per_year", &raw.payments_per_year)?
        .unwrap_or(config.payments_per_year);

    let day_count = match text(&raw.day_count) {
        Some(s) => s.parse::<DayCountConvention>()?,
        None => config.day_count,
    };
    let valuation_convention = match text(&raw.valuation_day_count) {
        Some(s) => s.parse::<DayCountConvention>()?,
        None => config.valuation_convention(day_count),
    };
    let payment_rule = match text(&raw.payment_rule) {
        Some(s) => s.parse::<PaymentRule>()?,
        None => config.payment_rule,
    };

    let dates = match optional::<NaiveDate>("first_payment_date", &raw.first_payment_date)? {
        Some(first) => build_payment_dates_from_first(first, term_months, payments_per_year)?,
        None => build_payment_dates(accrual_start, term_months, payments_per_year)?,
    };
    let schedule = sanitize_schedule(accrual_start, &dates)?;

    let tokens = text(&raw.index_rates).map(parse_rate_tokens).unwrap_or_default();
    let index_rates = normalize_rate_series(tokens.as_slice(), schedule.dates.len(), config.default_index_rate);

    let terms = LoanTerms {
        principal,
        spread: optional("spread", &raw.spread)?.unwrap_or(0.0),
        index_rates,
        payment_dates: schedule.dates,
        accrual_start,
        day_count,
        cap_rate: optional("cap_rate", &raw.cap_rate)?,
        floor_rate: optional("floor_rate", &raw.floor_rate)?,
        payment_rule,
        reset_cadence: optional("reset_cadence", &raw.reset_cadence)?.unwrap_or(config.reset_cadence),
        interest_only_periods: optional("interest_only_periods", &raw.interest_only_periods)?.unwrap_or(0),
        fixed_payment: optional("fixed_payment", &raw.fixed_payment)?,
    };
    terms.validate()?;

    let valuation = ValuationInputs {
        discount_yield: optional("discount_yield", &raw.discount_yield)?.unwrap_or(config.discount_yield),
        convention: valuation_convention,
        upfront_fee: optional("upfront_fee", &raw.upfront_fee)?.unwrap_or(config.upfront_fee),
    };
    if !valuation.discount_yield.is_finite() {
        return Err(PricingError::validation("discount_yield", "must be a finite number"));
    }
    if !valuation.upfront_fee.is_finite() {
        return Err(PricingError::validation("upfront_fee", "must be a finite number"));
    }

    Ok(PricingRequest {
        loan_id: raw.loan_id.clone(),
        terms,
        valuation,
        schedule_warning: schedule.warning,
    })
}

/// Trimmed, non-empty field text
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn optional<T>(field: &str, value: &Option<String>) -> PricingResult<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    text(value)
        .map(|s| {
            s.parse::<T>()
                .map_err(|e| PricingError::validation(field, format!("cannot parse '{}': {}", s, e)))
        })
        .transpose()
}

fn required<T>(field: &str, value: &Option<String>) -> PricingResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(field, value)?.ok_or_else(|| PricingError::validation(field, "is required"))
}
