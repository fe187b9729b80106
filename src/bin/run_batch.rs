//! Run every scenario of a CSV batch and write one summary row per scenario
//!
//! Invalid scenarios are reported and skipped; the rest still run.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};

use compound_projection::config::loader::{load_scenarios, DEFAULT_SCENARIOS_PATH};
use compound_projection::projection::export::{format_money, write_summary_csv, SummaryRow};
use compound_projection::scenario::ScenarioRunner;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a CSV batch of compound projection scenarios")]
struct Cli {
    /// Scenario CSV file
    #[arg(long, default_value = DEFAULT_SCENARIOS_PATH)]
    input: PathBuf,

    /// Summary CSV file to write
    #[arg(long, default_value = "batch_summary.csv")]
    output: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    println!("Loading scenarios from {}...", cli.input.display());
    let scenarios = load_scenarios(&cli.input)
        .with_context(|| format!("loading scenarios from {}", cli.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::default();

    let proj_start = Instant::now();
    let outcomes = runner.run_batch(&scenarios);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut rows = Vec::with_capacity(outcomes.len());
    for outcome in &outcomes {
        match &outcome.result {
            Ok(result) => rows.push(SummaryRow::new(outcome.name, &result.summary)),
            Err(err) => error!("scenario {} skipped: {}", outcome.name, err),
        }
    }

    let file = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    write_summary_csv(BufWriter::new(file), &rows)?;
    info!("{} of {} scenarios written", rows.len(), outcomes.len());
    println!("Output written to {}", cli.output.display());

    println!("\nBatch Summary:");
    for row in &rows {
        println!("  {:<24} {:>18}", row.name, format_money(row.final_balance));
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
