//! Index-rate series handling
//!
//! Externally supplied index rates arrive with arbitrary length and quality;
//! they are normalized here into exactly one rate per payment period.

pub mod loader;

pub use loader::{load_rate_series, load_rate_series_from_reader};

/// Split free text into rate tokens on commas, semicolons and whitespace
pub fn parse_rate_tokens(text: &str) -> Vec<&str> {
    text.split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Normalize a raw rate sequence into exactly `n_needed` period rates.
///
/// Tokens that do not parse as finite numbers are skipped. An empty result is
/// replaced by `[default_value]`; a short series is padded by repeating its
/// last element and a long one is truncated. Never fails.
pub fn normalize_rate_series<S: AsRef<str>>(
    raw_values: &[S],
    n_needed: usize,
    default_value: f64,
) -> Vec<f64> {
    let parsed: Vec<f64> = raw_values
        .iter()
        .filter_map(|token| token.as_ref().trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect();

    fit_to_length(parsed, n_needed, default_value)
}

/// Pad or truncate an already numeric series to `n_needed` values
pub fn fit_to_length(mut values: Vec<f64>, n_needed: usize, default_value: f64) -> Vec<f64> {
    if values.is_empty() {
        values.push(default_value);
    }
    let last = values[values.len() - 1];
    values.resize(n_needed, last);
    values
}

/// Apply a parallel shift (in decimal rate) to every period rate
pub fn shift_rates(rates: &[f64], shift: f64) -> Vec<f64> {
    rates.iter().map(|r| r + shift).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pads_with_last_value() {
        let rates = normalize_rate_series(&["0.05", "0.06"], 5, 0.04);
        assert_eq!(rates, vec![0.05, 0.06, 0.06, 0.06, 0.06]);
    }

    #[test]
    fn test_empty_uses_default() {
        let empty: [&str; 0] = [];
        assert_eq!(normalize_rate_series(&empty, 3, 0.04), vec![0.04, 0.04, 0.04]);
    }

    #[test]
    fn test_truncates_long_series() {
        let rates = normalize_rate_series(&["0.01", "0.02", "0.03", "0.04"], 2, 0.05);
        assert_eq!(rates, vec![0.01, 0.02]);
    }

    #[test]
    fn test_skips_non_numeric_tokens() {
        let rates = normalize_rate_series(&["abc", " 0.045 ", "", "NaN", "inf", "0.05"], 3, 0.01);
        assert_eq!(rates, vec![0.045, 0.05, 0.05]);

        let rates = normalize_rate_series(&["n/a", "--"], 2, 0.03);
        assert_eq!(rates, vec![0.03, 0.03]);
    }

    #[test]
    fn test_zero_needed_is_empty() {
        assert!(normalize_rate_series(&["0.05"], 0, 0.04).is_empty());
    }

    #[test]
    fn test_parse_rate_tokens() {
        let tokens = parse_rate_tokens("0.05, 0.051;0.052\n0.053\t x");
        assert_eq!(tokens, vec!["0.05", "0.051", "0.052", "0.053", "x"]);
        assert!(parse_rate_tokens("  ,, ").is_empty());
    }

    #[test]
    fn test_shift_rates() {
        let shifted = shift_rates(&[0.05, 0.06], -0.01);
        assert!((shifted[0] - 0.04).abs() < 1e-12);
        assert!((shifted[1] - 0.05).abs() < 1e-12);
    }
}
