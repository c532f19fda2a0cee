//! Price every loan of a CSV book
//!
//! Outputs one summary row per loan. Loans that fail validation are reported
//! with their error and do not stop the run.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use loan_pricer::request::load_requests;
use loan_pricer::ScenarioRunner;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "price_book", version, about = "Price a book of floating-rate loans")]
struct Args {
    /// CSV book with one loan per row
    #[arg(default_value = "loan_book.csv")]
    input: String,

    /// Summary output path
    #[arg(long, default_value = "book_pricing_output.csv")]
    output: String,
}

/// One output line per loan
#[derive(Debug, Serialize, Default)]
struct BookRow {
    index: usize,
    loan_id: String,
    status: String,
    periods: u32,
    total_interest: f64,
    total_payments: f64,
    negative_amortization_periods: u32,
    pv_inflows: f64,
    npv: f64,
    price_pct: f64,
    irr_pct: Option<f64>,
    notice: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let start = Instant::now();
    println!("Loading loans from {}...", args.input);
    let requests = load_requests(&args.input)
        .with_context(|| format!("failed to load book from {}", args.input))?;
    println!("Loaded {} loans in {:?}", requests.len(), start.elapsed());

    let runner = ScenarioRunner::from_env();

    println!("Pricing...");
    let price_start = Instant::now();
    let entries = runner.run_book(&requests);
    println!("Pricing complete in {:?}", price_start.elapsed());

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to create {}", args.output))?;

    let mut priced = 0usize;
    let mut total_principal = 0.0;
    let mut total_pv = 0.0;

    for entry in &entries {
        let loan_id = entry.loan_id.clone().unwrap_or_else(|| format!("row-{}", entry.index + 1));
        let row = match &entry.outcome {
            Ok(outcome) => {
                priced += 1;
                total_principal += outcome.summary.total_principal;
                total_pv += outcome.metrics.pv_inflows;
                BookRow {
                    index: entry.index,
                    loan_id,
                    status: "ok".to_string(),
                    periods: outcome.summary.periods,
                    total_interest: outcome.summary.total_interest,
                    total_payments: outcome.summary.total_payments,
                    negative_amortization_periods: outcome.summary.negative_amortization_periods,
                    pv_inflows: outcome.metrics.pv_inflows,
                    npv: outcome.metrics.npv,
                    price_pct: outcome.metrics.price_percent(),
                    irr_pct: outcome.metrics.irr.map(|r| r * 100.0),
                    notice: outcome
                        .schedule_warning
                        .as_ref()
                        .map(|w| w.to_string())
                        .unwrap_or_default(),
                }
            }
            Err(message) => BookRow {
                index: entry.index,
                loan_id,
                status: "error".to_string(),
                notice: message.clone(),
                ..Default::default()
            },
        };
        writer.serialize(&row)?;
    }
    writer.flush()?;

    println!("Output written to {}", args.output);

    println!("\nBook Summary:");
    println!("  Loans priced: {} of {}", priced, entries.len());
    println!("  Total principal: ${:.0}", total_principal);
    if total_principal > 0.0 {
        println!("  Book price: {:.4}% of par", total_pv / total_principal * 100.0);
    }
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
