//! Compound projection CLI
//!
//! Runs a single month-by-month projection from command-line flags or a JSON
//! configuration file and prints the yearly breakdown and summary.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use compound_projection::config::{
    loader, CompoundingFrequency, Configuration, ConfigurationBuilder, ContributionFrequency,
    PeriodTarget, TaxBase, Timing,
};
use compound_projection::projection::export::{format_money, write_monthly_csv, write_yearly_csv};
use compound_projection::projection::ProjectionEngine;

#[derive(Parser, Debug)]
#[command(author, version, about = "Project a compound-interest investment month by month")]
struct Cli {
    /// JSON configuration file; when given, the projection flags are ignored
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial investment
    #[arg(long, default_value_t = 10_000.0)]
    principal: f64,

    /// Annual interest rate in percent
    #[arg(long, default_value_t = 5.0)]
    rate: f64,

    /// Investment period in years
    #[arg(long, default_value_t = 10)]
    years: u32,

    /// Compounding periods per year (1, 2, 4, 12, 24, 26, 52, 365), 0 for continuous
    #[arg(long, default_value_t = 12)]
    compounding: u32,

    /// Withdraw interest instead of reinvesting it
    #[arg(long)]
    encash: bool,

    #[arg(long, default_value_t = 1)]
    encash_year: u32,

    /// Month (1-12) within the encash year; omit to start on the year boundary
    #[arg(long)]
    encash_month: Option<u32>,

    #[arg(long, default_value = "start")]
    encash_timing: Timing,

    /// Share of the interest withdrawn at each compounding event, 1-100
    #[arg(long, default_value_t = 100.0)]
    encash_pct: f64,

    /// Contribution per month (yearly plans pay twelve of these at once)
    #[arg(long)]
    contribution: Option<f64>,

    #[arg(long, default_value = "monthly")]
    contribution_frequency: ContributionFrequency,

    #[arg(long, default_value = "end")]
    contribution_timing: Timing,

    /// Contribution increase in percent
    #[arg(long, default_value_t = 0.0)]
    growth_pct: f64,

    /// Months between contribution increases
    #[arg(long, default_value_t = 12)]
    growth_every: u32,

    /// Year in which contributions stop
    #[arg(long)]
    stop_year: Option<u32>,

    #[arg(long)]
    stop_month: Option<u32>,

    #[arg(long, default_value = "end")]
    stop_timing: Timing,

    /// Tax rate in percent
    #[arg(long)]
    tax_pct: Option<f64>,

    /// What the tax applies to: interest or whole
    #[arg(long, default_value = "interest")]
    tax_base: TaxBase,

    /// Annual inflation in percent
    #[arg(long)]
    inflation_pct: Option<f64>,

    /// Write the monthly breakdown to this CSV file
    #[arg(long)]
    monthly_csv: Option<PathBuf>,

    /// Write the yearly breakdown to this CSV file
    #[arg(long)]
    yearly_csv: Option<PathBuf>,

    /// Print the full result as JSON instead of the text report
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn configuration(&self) -> Result<Configuration> {
        if let Some(path) = &self.config {
            return loader::load_configuration(path)
                .with_context(|| format!("loading configuration from {}", path.display()));
        }

        let mut builder = ConfigurationBuilder::new()
            .principal(self.principal)
            .annual_rate_percent(self.rate)
            .horizon_years(self.years)
            .compounding(CompoundingFrequency::from_periods_per_year(self.compounding)?);

        if let Some(amount) = self.contribution.filter(|amount| *amount > 0.0) {
            builder = builder
                .contribution(amount, self.contribution_frequency, self.contribution_timing)
                .contribution_growth(self.growth_pct / 100.0, self.growth_every);
            if let Some(year) = self.stop_year {
                builder = builder.stop_contributions(
                    PeriodTarget::from_parts(year, self.stop_month),
                    self.stop_timing,
                );
            } else if self.stop_month.is_some() {
                log::warn!("--stop-month given without --stop-year, contributions never stop");
            }
        }

        if self.encash {
            builder = builder.encash(
                PeriodTarget::from_parts(self.encash_year, self.encash_month),
                self.encash_timing,
                self.encash_pct,
            );
        }
        if let Some(rate) = self.tax_pct {
            builder = builder.tax(rate, self.tax_base);
        }
        if let Some(rate) = self.inflation_pct {
            builder = builder.inflation(rate);
        }

        Ok(builder.build()?)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = cli.configuration()?;
    let engine = ProjectionEngine::new(config)?;
    let result = engine.run();

    if let Some(path) = &cli.monthly_csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_monthly_csv(BufWriter::new(file), &result.monthly)?;
        log::info!("monthly breakdown written to {}", path.display());
    }
    if let Some(path) = &cli.yearly_csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_yearly_csv(BufWriter::new(file), &result.yearly)?;
        log::info!("yearly breakdown written to {}", path.display());
    }

    if cli.json {
        serde_json::to_writer_pretty(io::stdout().lock(), &result)?;
        println!();
        return Ok(());
    }

    let config = engine.config();
    println!("Compound Projection");
    println!("===================\n");
    println!("  Principal:    {}", format_money(config.principal));
    println!("  Annual Rate:  {:.2}%", config.annual_rate * 100.0);
    println!("  Compounding:  {}", config.compounding.as_str());
    println!("  Period:       {} years", config.horizon_years);
    if let Some(stop) = engine.contributions().plan().and_then(|plan| plan.stop) {
        println!("  {}", stop);
    }
    if let Some(policy) = engine.encashment() {
        println!("  {}", policy);
    }
    println!();

    println!(
        "{:>5} {:>16} {:>14} {:>14} {:>14} {:>16}",
        "Year", "Start", "Contributions", "Interest", "Encashed", "End"
    );
    println!("{}", "-".repeat(84));
    for row in &result.yearly {
        println!(
            "{:>5} {:>16} {:>14} {:>14} {:>14} {:>16}",
            row.year,
            format_money(row.starting_balance),
            format_money(row.contributions),
            format_money(row.interest),
            format_money(row.encashed),
            format_money(row.ending_balance),
        );
    }

    let summary = &result.summary;
    println!("\nSummary:");
    println!("  Final Balance:          {}", format_money(summary.final_balance));
    println!("  Total Invested:         {}", format_money(summary.total_invested));
    println!("  Total Interest Earned:  {}", format_money(summary.total_interest_earned));
    if summary.total_encashed_interest > 0.0 {
        println!("  Total Encashed:         {}", format_money(summary.total_encashed_interest));
    }
    if let Some(after_tax) = summary.balance_after_tax {
        println!("  After Tax:              {}", format_money(after_tax));
    }
    if let Some(real) = summary.balance_after_inflation {
        println!("  After Inflation:        {}", format_money(real));
    }
    println!("  Effective Annual Rate:  {:.4}%", summary.effective_annual_rate * 100.0);

    Ok(())
}
