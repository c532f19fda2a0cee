//! Loan Pricer CLI
//!
//! Prices a single floating-rate loan, prints the schedule and metrics, and
//! writes the full amortization schedule to CSV.

use anyhow::{Context, Result};
use clap::Parser;
use loan_pricer::rates::load_rate_series;
use loan_pricer::{price_loan, RawPricingRequest, ScenarioRunner};

/// Price a floating-rate loan
#[derive(Parser, Debug)]
#[command(name = "loan_pricer", version, about)]
struct Cli {
    /// Loan amount
    #[arg(long)]
    principal: String,

    /// Accrual start date (YYYY-MM-DD)
    #[arg(long)]
    start_date: String,

    /// Loan term in months
    #[arg(long)]
    term_months: String,

    /// Spread over the index (decimal)
    #[arg(long)]
    spread: Option<String>,

    /// Period index rates separated by commas or spaces
    #[arg(long, conflicts_with = "rates_file")]
    index_rates: Option<String>,

    /// CSV file with a `rate` column (or rates in the first column)
    #[arg(long)]
    rates_file: Option<String>,

    #[arg(long)]
    first_payment_date: Option<String>,

    /// 1, 2, 3, 4, 6 or 12
    #[arg(long)]
    payments_per_year: Option<String>,

    /// 30/360, ACT/360 or ACT/365
    #[arg(long)]
    day_count: Option<String>,

    /// Day count used for discounting (defaults to the loan's)
    #[arg(long)]
    valuation_day_count: Option<String>,

    #[arg(long)]
    cap_rate: Option<String>,

    #[arg(long)]
    floor_rate: Option<String>,

    /// recast_on_reset or fixed_payment
    #[arg(long)]
    payment_rule: Option<String>,

    #[arg(long)]
    reset_cadence: Option<String>,

    #[arg(long)]
    interest_only_periods: Option<String>,

    #[arg(long)]
    fixed_payment: Option<String>,

    /// Annual discount yield (decimal)
    #[arg(long)]
    discount_yield: Option<String>,

    #[arg(long)]
    upfront_fee: Option<String>,

    /// Parallel index shifts in basis points, e.g. "-100,0,100"
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    shocks_bp: Vec<f64>,

    /// Schedule output path
    #[arg(long, default_value = "amortization_schedule.csv")]
    output: String,

    /// Print the full outcome as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn to_raw(&self) -> Result<RawPricingRequest> {
        let index_rates = match &self.rates_file {
            Some(path) => Some(
                load_rate_series(path)
                    .with_context(|| format!("failed to read rates from {}", path))?
                    .join(" "),
            ),
            None => self.index_rates.clone(),
        };

        Ok(RawPricingRequest {
            loan_id: None,
            principal: Some(self.principal.clone()),
            spread: self.spread.clone(),
            index_rates,
            start_date: Some(self.start_date.clone()),
            first_payment_date: self.first_payment_date.clone(),
            term_months: Some(self.term_months.clone()),
            payments_per_year: self.payments_per_year.clone(),
            day_count: self.day_count.clone(),
            valuation_day_count: self.valuation_day_count.clone(),
            cap_rate: self.cap_rate.clone(),
            floor_rate: self.floor_rate.clone(),
            payment_rule: self.payment_rule.clone(),
            reset_cadence: self.reset_cadence.clone(),
            interest_only_periods: self.interest_only_periods.clone(),
            fixed_payment: self.fixed_payment.clone(),
            discount_yield: self.discount_yield.clone(),
            upfront_fee: self.upfront_fee.clone(),
        })
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let runner = ScenarioRunner::from_env();
    let request = runner
        .parse(&cli.to_raw()?)
        .context("invalid loan request")?;
    let outcome = price_loan(&request).context("pricing failed")?;

    if let Some(warning) = &outcome.schedule_warning {
        eprintln!("Notice: {}", warning);
    }

    let shocks = if cli.shocks_bp.is_empty() {
        Vec::new()
    } else {
        let shifts: Vec<f64> = cli.shocks_bp.iter().map(|bp| bp / 10_000.0).collect();
        runner.run_rate_shocks(&request, &shifts).context("rate shocks failed")?
    };

    if cli.json {
        let body = serde_json::json!({ "outcome": outcome, "shocks": shocks });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("Loan Pricer v{}", env!("CARGO_PKG_VERSION"));
        println!("==================\n");

        println!("{:>4} {:>10} {:>8} {:>9} {:>15} {:>13} {:>13} {:>13} {:>15}",
            "Per", "PayDate", "DCF", "Rate", "BOP Balance", "Payment", "Interest", "Principal", "EOP Balance");
        println!("{}", "-".repeat(110));

        for row in outcome.rows.iter().take(24) {
            println!("{:>4} {:>10} {:>8.5} {:>8.4}% {:>15.2} {:>13.2} {:>13.2} {:>13.2} {:>15.2}{}",
                row.period,
                row.payment_date,
                row.day_count_fraction,
                row.all_in_rate * 100.0,
                row.beginning_balance,
                row.payment,
                row.interest,
                row.principal,
                row.ending_balance,
                if row.negative_amortization { " NEG-AM" } else { "" },
            );
        }
        if outcome.rows.len() > 24 {
            println!("... ({} more periods)", outcome.rows.len() - 24);
        }

        let summary = &outcome.summary;
        let metrics = &outcome.metrics;
        println!("\nSummary:");
        println!("  Periods: {}", summary.periods);
        println!("  Total Payments: ${:.2}", summary.total_payments);
        println!("  Total Interest: ${:.2}", summary.total_interest);
        println!("  Negative Amortization Periods: {}", summary.negative_amortization_periods);
        println!("  PV of Inflows: ${:.2}", metrics.pv_inflows);
        println!("  NPV: ${:.2}", metrics.npv);
        println!("  Price: {:.4}% of par", metrics.price_percent());
        match metrics.irr {
            Some(irr) => println!("  IRR: {:.4}%", irr * 100.0),
            None => println!("  IRR: undefined"),
        }

        if !shocks.is_empty() {
            println!("\nRate Shocks:");
            for shock in &shocks {
                println!("  {:>+6.0}bp: Price={:.4}% Interest=${:.2}",
                    shock.shift * 10_000.0,
                    shock.metrics.price_percent(),
                    shock.total_interest,
                );
            }
        }
    }

    let mut writer = csv::Writer::from_path(&cli.output)
        .with_context(|| format!("unable to create {}", cli.output))?;
    for row in &outcome.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    if !cli.json {
        println!("\nFull schedule written to: {}", cli.output);
    }

    Ok(())
}
