//! Error types shared by every stage of loan pricing

use chrono::NaiveDate;
use thiserror::Error;

/// Result alias used throughout the engine
pub type PricingResult<T> = Result<T, PricingError>;

/// Failures raised while building or valuing a loan schedule.
///
/// Every variant is raised at the point of violation and propagated to the
/// caller unchanged. IRR non-convergence is not an error (see
/// [`crate::valuation::internal_rate_of_return`]).
#[derive(Debug, Error)]
pub enum PricingError {
    /// Dates supplied out of sequence
    #[error("end date {end} is before start date {start}")]
    Ordering { start: NaiveDate, end: NaiveDate },

    /// Day-count convention text not recognised
    #[error("unsupported day-count convention: {0}")]
    UnsupportedConvention(String),

    /// Payments per year must be a positive divisor of 12
    #[error("invalid payment frequency: {0} payments per year (expected 1, 2, 3, 4, 6 or 12)")]
    InvalidFrequency(i32),

    #[error("payment schedule is empty")]
    EmptySchedule,

    /// A payment date does not fall strictly after its predecessor
    #[error("payment schedule is not strictly increasing at period {period}: {date} follows {previous}")]
    NonMonotonicSchedule {
        period: usize,
        previous: NaiveDate,
        date: NaiveDate,
    },

    /// Loan terms or request fields failed validation
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Date arithmetic left the representable calendar
    #[error("date out of range: {0}")]
    DateOutOfRange(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PricingError {
    /// Convenience constructor for validation failures
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PricingError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
