//! Load configurations from JSON documents and scenario batches from CSV

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use log::warn;

use super::{
    CompoundingFrequency, ConfigError, Configuration, ConfigurationBuilder, ContributionFrequency,
    InterestDisposition, LoadError, PeriodTarget, TaxBase, Timing,
};
use crate::scenario::Scenario;

/// Scenario batch read by [`load_default_scenarios`]
pub const DEFAULT_SCENARIOS_PATH: &str = "scenarios.csv";

/// Raw CSV row of a scenario batch. Percentages are given as 0-100.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    name: String,
    principal: f64,
    annual_rate_pct: f64,
    years: u32,
    /// Periods per year, 0 for continuous
    compounding_periods: u32,
    disposition: String,

    contribution: Option<f64>,
    contribution_frequency: Option<String>,
    contribution_timing: Option<String>,
    growth_pct: Option<f64>,
    growth_every_months: Option<u32>,
    stop_year: Option<u32>,
    stop_month: Option<u32>,
    stop_timing: Option<String>,

    encash_year: Option<u32>,
    encash_month: Option<u32>,
    encash_timing: Option<String>,
    encash_pct: Option<f64>,

    tax_pct: Option<f64>,
    tax_base: Option<String>,
    inflation_pct: Option<f64>,
}

impl CsvRow {
    fn to_configuration(&self) -> Result<Configuration, ConfigError> {
        let mut builder = ConfigurationBuilder::new()
            .principal(self.principal)
            .annual_rate_percent(self.annual_rate_pct)
            .horizon_years(self.years)
            .compounding(CompoundingFrequency::from_periods_per_year(
                self.compounding_periods,
            )?);

        match self.contribution {
            Some(amount) if amount > 0.0 => {
                let frequency = parse_or(&self.contribution_frequency, ContributionFrequency::Monthly)?;
                let timing = parse_or(&self.contribution_timing, Timing::End)?;
                builder = builder.contribution(amount, frequency, timing).contribution_growth(
                    self.growth_pct.unwrap_or(0.0) / 100.0,
                    self.growth_every_months.unwrap_or(12),
                );
                if let Some(year) = self.stop_year {
                    let period = PeriodTarget::from_parts(year, self.stop_month);
                    builder = builder.stop_contributions(period, parse_or(&self.stop_timing, Timing::End)?);
                } else if self.stop_month.is_some() {
                    warn!("scenario {}: stop_month without stop_year, contributions never stop", self.name);
                }
            }
            _ => {
                if self.stop_year.is_some() || self.stop_month.is_some() || self.growth_pct.is_some() {
                    warn!("scenario {}: no contribution, ignoring growth and stop columns", self.name);
                }
            }
        }

        if self.disposition.parse::<InterestDisposition>()?.is_encash() {
            let start = PeriodTarget::from_parts(self.encash_year.unwrap_or(1), self.encash_month);
            let timing = parse_or(&self.encash_timing, Timing::Start)?;
            builder = builder.encash(start, timing, self.encash_pct.unwrap_or(100.0));
        } else if self.encash_year.is_some() || self.encash_pct.is_some() {
            warn!("scenario {}: interest is reinvested, ignoring encash columns", self.name);
        }

        if let Some(rate) = self.tax_pct {
            builder = builder.tax(rate, parse_or(&self.tax_base, TaxBase::default())?);
        }
        if let Some(rate) = self.inflation_pct {
            builder = builder.inflation(rate);
        }

        builder.build()
    }
}

/// Parse an optional column, falling back to `default` when it is empty
fn parse_or<T>(value: &Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr<Err = ConfigError>,
{
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => text.parse(),
        _ => Ok(default),
    }
}

/// Load and validate a JSON configuration document
pub fn load_configuration<P: AsRef<Path>>(path: P) -> Result<Configuration, LoadError> {
    let file = File::open(path)?;
    load_configuration_from_reader(BufReader::new(file))
}

/// Load and validate a JSON configuration from any reader
pub fn load_configuration_from_reader<R: Read>(reader: R) -> Result<Configuration, LoadError> {
    let config: Configuration = serde_json::from_reader(reader)?;
    config.validate()?;
    Ok(config)
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<Scenario>, LoadError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<Scenario>, LoadError> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut scenarios = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        // Header is line 1
        let line = index + 2;
        let config = row.to_configuration().map_err(|source| LoadError::Scenario {
            line,
            name: row.name.clone(),
            source,
        })?;
        scenarios.push(Scenario::new(row.name, config));
    }

    Ok(scenarios)
}

/// Load scenarios from the default scenarios.csv location
pub fn load_default_scenarios() -> Result<Vec<Scenario>, LoadError> {
    load_scenarios(DEFAULT_SCENARIOS_PATH)
}
