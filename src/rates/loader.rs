//! Load raw index-rate series from CSV
//!
//! The file is read as raw text tokens. Use [`super::normalize_rate_series`]
//! to turn them into period rates.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use crate::error::PricingResult;

/// Column read when the file has a header row containing it
pub const RATE_COLUMN: &str = "rate";

/// Load raw rate tokens from a CSV file
pub fn load_rate_series<P: AsRef<Path>>(path: P) -> PricingResult<Vec<String>> {
    let file = std::fs::File::open(path)?;
    load_rate_series_from_reader(file)
}

/// Load raw rate tokens from any reader.
///
/// Reads the `rate` column when the first row names one, otherwise the first
/// column of every row (including the first).
pub fn load_rate_series_from_reader<R: Read>(reader: R) -> PricingResult<Vec<String>> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut tokens = Vec::new();
    let mut column = 0;

    for (i, result) in csv_reader.records().enumerate() {
        let record = result?;
        if i == 0 {
            if let Some(pos) = record.iter().position(|h| h.eq_ignore_ascii_case(RATE_COLUMN)) {
                column = pos;
                continue;
            }
        }
        if let Some(field) = record.get(column) {
            tokens.push(field.to_string());
        }
    }

    Ok(tokens)
}
