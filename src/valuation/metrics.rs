//! Lender cashflows and pricing metrics for a schedule

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::discount::present_value;
use super::irr::internal_rate_of_return;
use crate::amortization::AmortizationRow;
use crate::calendar::DayCountConvention;
use crate::error::{PricingError, PricingResult};

/// Dated lender cashflows: the net disbursement followed by each payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowVector {
    pub dates: Vec<NaiveDate>,
    pub amounts: Vec<f64>,
}

impl CashflowVector {
    /// Build lender cashflows from a schedule.
    ///
    /// The first flow, at `accrual_start`, is `-principal + upfront_fee`.
    pub fn from_schedule(
        rows: &[AmortizationRow],
        accrual_start: NaiveDate,
        principal: f64,
        upfront_fee: f64,
    ) -> Self {
        let mut dates = Vec::with_capacity(rows.len() + 1);
        let mut amounts = Vec::with_capacity(rows.len() + 1);

        dates.push(accrual_start);
        amounts.push(-principal + upfront_fee);

        for row in rows {
            dates.push(row.payment_date);
            amounts.push(row.payment);
        }

        Self { dates, amounts }
    }

    /// Payment flows only, without the initial disbursement
    pub fn inflows(&self) -> (&[NaiveDate], &[f64]) {
        (&self.dates[1..], &self.amounts[1..])
    }
}

/// Inputs for valuing a schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationInputs {
    /// Annual discount yield
    pub discount_yield: f64,
    pub convention: DayCountConvention,
    /// Fee received by the lender at the accrual start
    pub upfront_fee: f64,
}

/// Valuation results for one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingMetrics {
    /// PV of all flows, including the net disbursement
    pub npv: f64,
    /// PV of the scheduled payments
    pub pv_inflows: f64,
    /// `(upfront_fee + pv_inflows) / principal`; 1.0 is par
    pub price: f64,
    /// Annual IRR, `None` when undefined
    pub irr: Option<f64>,
}

impl PricingMetrics {
    /// Price quoted in percent of par
    pub fn price_percent(&self) -> f64 {
        self.price * 100.0
    }
}

/// Value a built schedule at the given yield
pub fn price_schedule(
    rows: &[AmortizationRow],
    accrual_start: NaiveDate,
    principal: f64,
    inputs: &ValuationInputs,
) -> PricingResult<PricingMetrics> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(PricingError::validation(
            "principal",
            format!("must be positive, got {}", principal),
        ));
    }

    let flows = CashflowVector::from_schedule(rows, accrual_start, principal, inputs.upfront_fee);
    let (inflow_dates, inflow_amounts) = flows.inflows();

    let pv_inflows = present_value(
        inflow_dates,
        inflow_amounts,
        inputs.discount_yield,
        inputs.convention,
        accrual_start,
    )?;
    let npv = present_value(
        &flows.dates,
        &flows.amounts,
        inputs.discount_yield,
        inputs.convention,
        accrual_start,
    )?;
    let irr = internal_rate_of_return(&flows.dates, accrual_start, &flows.amounts, inputs.convention)?;

    Ok(PricingMetrics {
        npv,
        pv_inflows,
        price: (inputs.upfront_fee + pv_inflows) / principal,
        irr,
    })
}
