//! Scenario runner for batch projections
//!
//! Holds a base configuration and runs many variations of it, or a batch of
//! independent named scenarios, in parallel.

use log::info;
use rayon::prelude::*;

use crate::config::{ConfigError, Configuration};
use crate::projection::{ProjectionEngine, ProjectionResult};

/// A named configuration, one row of a scenario batch
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub config: Configuration,
}

impl Scenario {
    pub fn new(name: impl Into<String>, config: Configuration) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Result of running one scenario of a batch
#[derive(Debug, Clone)]
pub struct ScenarioOutcome<'a> {
    pub name: &'a str,
    pub result: Result<ProjectionResult, ConfigError>,
}

/// Runs projections against a shared base configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(ConfigurationBuilder::new().build()?);
///
/// // Sweep the rate, everything else from the base
/// let results = runner.run_rates(&[0.03, 0.04, 0.05]);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base: Configuration,
}

impl ScenarioRunner {
    pub fn new(base: Configuration) -> Self {
        Self { base }
    }

    /// Run the base configuration
    pub fn run_base(&self) -> Result<ProjectionResult, ConfigError> {
        self.run(&self.base)
    }

    /// Run a single projection with the given config
    pub fn run(&self, config: &Configuration) -> Result<ProjectionResult, ConfigError> {
        Ok(ProjectionEngine::new(config.clone())?.run())
    }

    /// Run independent scenarios in parallel, keeping input order
    pub fn run_batch<'a>(&self, scenarios: &'a [Scenario]) -> Vec<ScenarioOutcome<'a>> {
        info!("running {} scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: &scenario.name,
                result: self.run(&scenario.config),
            })
            .collect()
    }

    /// Run the base configuration once per annual rate (fractions, 0.05 for 5%)
    pub fn run_rates(&self, rates: &[f64]) -> Vec<Result<ProjectionResult, ConfigError>> {
        self.run_variations(rates, |config, &rate| config.annual_rate = rate)
    }

    /// Run the base configuration once per horizon in years
    pub fn run_horizons(&self, years: &[u32]) -> Vec<Result<ProjectionResult, ConfigError>> {
        self.run_variations(years, |config, &horizon| config.horizon_years = horizon)
    }

    fn run_variations<T, F>(&self, values: &[T], apply: F) -> Vec<Result<ProjectionResult, ConfigError>>
    where
        T: Sync,
        F: Fn(&mut Configuration, &T) + Sync,
    {
        values
            .par_iter()
            .map(|value| {
                let mut config = self.base.clone();
                apply(&mut config, value);
                self.run(&config)
            })
            .collect()
    }

    /// Get reference to the base configuration
    pub fn base(&self) -> &Configuration {
        &self.base
    }

    /// Get mutable reference to the base configuration for customization
    pub fn base_mut(&mut self) -> &mut Configuration {
        &mut self.base
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
