//! Load a book of raw pricing requests from CSV
//!
//! Column headers match the field names of [`RawPricingRequest`]; missing
//! columns and blank cells are treated as omitted fields.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;

use super::RawPricingRequest;
use crate::error::PricingResult;

/// Load all requests from a CSV file
pub fn load_requests<P: AsRef<Path>>(path: P) -> PricingResult<Vec<RawPricingRequest>> {
    let file = std::fs::File::open(path)?;
    load_requests_from_reader(file)
}

/// Load requests from any reader (e.g., string buffer, network stream)
pub fn load_requests_from_reader<R: Read>(reader: R) -> PricingResult<Vec<RawPricingRequest>> {
    let mut csv_reader = ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut requests = Vec::new();

    for result in csv_reader.deserialize() {
        let row: RawPricingRequest = result?;
        requests.push(row);
    }

    Ok(requests)
}
