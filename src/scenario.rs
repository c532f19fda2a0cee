//! Scenario runner for batch and rate-shock pricing
//!
//! Each job builds its own terms and schedule, so jobs run in parallel on
//! the rayon pool without sharing any state.
//!
//! # Example
//! ```ignore
//! let runner = ScenarioRunner::from_env();
//! let request = runner.parse(&raw)?;
//!
//! // Reprice under +/-100bp parallel index shifts
//! let shocks = runner.run_rate_shocks(&request, &[-0.01, 0.0, 0.01])?;
//! ```

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::error::PricingResult;
use crate::pricing::{price_loan, PricingOutcome};
use crate::rates::shift_rates;
use crate::request::{parse_request, PricingRequest, RawPricingRequest};
use crate::valuation::PricingMetrics;

/// Metrics for one parallel index shift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShockResult {
    /// Shift added to every period index rate (decimal)
    pub shift: f64,
    pub total_interest: f64,
    pub metrics: PricingMetrics,
}

/// Pricing result for one loan of a book
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookEntry {
    /// Position in the input book (0-based)
    pub index: usize,
    pub loan_id: Option<String>,
    /// Error message when the loan could not be priced
    pub outcome: Result<PricingOutcome, String>,
}

/// Pricing runner holding the defaults applied to raw requests
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    config: PricingConfig,
}

impl ScenarioRunner {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    /// Runner configured from `LOAN_*` environment variables
    pub fn from_env() -> Self {
        Self::new(PricingConfig::from_env())
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Parse raw parameters with this runner's defaults
    pub fn parse(&self, raw: &RawPricingRequest) -> PricingResult<PricingRequest> {
        parse_request(raw, &self.config)
    }

    /// Reprice `request` once per shift, with every index rate moved by the shift.
    ///
    /// Results come back in the order of `shifts`. The first failure aborts
    /// the whole run.
    pub fn run_rate_shocks(&self, request: &PricingRequest, shifts: &[f64]) -> PricingResult<Vec<ShockResult>> {
        info!("running {} rate shocks", shifts.len());

        shifts
            .par_iter()
            .map(|&shift| -> PricingResult<ShockResult> {
                let mut shocked = request.clone();
                shocked.terms.index_rates = shift_rates(&request.terms.index_rates, shift);
                let outcome = price_loan(&shocked)?;
                Ok(ShockResult {
                    shift,
                    total_interest: outcome.summary.total_interest,
                    metrics: outcome.metrics,
                })
            })
            .collect()
    }

    /// Parse and price every request of a book in parallel.
    ///
    /// A loan that fails carries its error message; the rest of the book is
    /// still priced.
    pub fn run_book(&self, requests: &[RawPricingRequest]) -> Vec<BookEntry> {
        info!("pricing book of {} loans", requests.len());

        requests
            .par_iter()
            .enumerate()
            .map(|(index, raw)| BookEntry {
                index,
                loan_id: raw.loan_id.clone(),
                outcome: self
                    .parse(raw)
                    .and_then(|request| price_loan(&request))
                    .map_err(|e| e.to_string()),
            })
            .collect()
    }
}
