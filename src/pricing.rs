//! One-call pricing of a validated loan request

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::amortization::{build_schedule, AmortizationRow, ScheduleSummary};
use crate::config::PricingConfig;
use crate::error::PricingResult;
use crate::request::{parse_request, PricingRequest, RawPricingRequest};
use crate::schedule::ScheduleWarning;
use crate::valuation::{price_schedule, PricingMetrics};

/// Full pricing result for one loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOutcome {
    pub loan_id: Option<String>,
    pub rows: Vec<AmortizationRow>,
    pub summary: ScheduleSummary,
    pub metrics: PricingMetrics,
    /// Non-fatal notice for the presentation layer
    pub schedule_warning: Option<ScheduleWarning>,
}

/// Build the schedule for `request` and value it
pub fn price_loan(request: &PricingRequest) -> PricingResult<PricingOutcome> {
    if let Some(warning) = &request.schedule_warning {
        warn!(
            "pricing {} with adjusted schedule: {}",
            request.loan_id.as_deref().unwrap_or("loan"),
            warning
        );
    }

    let terms = &request.terms;
    let rows = build_schedule(terms)?;
    let summary = ScheduleSummary::from_rows(&rows);
    let metrics = price_schedule(&rows, terms.accrual_start, terms.principal, &request.valuation)?;

    info!(
        "priced {}: {} periods, price {:.4}% of par, irr {}",
        request.loan_id.as_deref().unwrap_or("loan"),
        summary.periods,
        metrics.price_percent(),
        metrics
            .irr
            .map(|r| format!("{:.4}%", r * 100.0))
            .unwrap_or_else(|| "undefined".to_string()),
    );

    Ok(PricingOutcome {
        loan_id: request.loan_id.clone(),
        rows,
        summary,
        metrics,
        schedule_warning: request.schedule_warning.clone(),
    })
}

/// Parse raw parameters and price them in one step
pub fn price_raw(raw: &RawPricingRequest, config: &PricingConfig) -> PricingResult<PricingOutcome> {
    let request = parse_request(raw, config)?;
    price_loan(&request)
}
