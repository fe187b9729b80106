//! Step-by-step construction of a validated [`Configuration`]

use super::{
    CompoundingFrequency, ConfigError, Configuration, ContributionFrequency, ContributionPlan,
    EncashmentPlan, InterestDisposition, PeriodTarget, StopPolicy, TaxBase, TaxTreatment, Timing,
};

/// Builder for [`Configuration`].
///
/// Defaults follow the calculator form: 10,000 at 5% compounded monthly for
/// 10 years, interest reinvested, no contributions, no tax or inflation.
/// Nothing is checked until [`ConfigurationBuilder::build`].
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl Default for ConfigurationBuilder {
    fn default() -> Self {
        Self {
            config: Configuration::default(),
        }
    }
}

impl ConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration
    pub fn from_config(config: Configuration) -> Self {
        Self { config }
    }

    pub fn principal(mut self, principal: f64) -> Self {
        self.config.principal = principal;
        self
    }

    /// Annual nominal rate as a fraction
    pub fn annual_rate(mut self, rate: f64) -> Self {
        self.config.annual_rate = rate;
        self
    }

    /// Annual nominal rate as a percentage, the way the form collects it
    pub fn annual_rate_percent(self, percent: f64) -> Self {
        self.annual_rate(percent / 100.0)
    }

    pub fn horizon_years(mut self, years: u32) -> Self {
        self.config.horizon_years = years;
        self
    }

    pub fn compounding(mut self, frequency: CompoundingFrequency) -> Self {
        self.config.compounding = frequency;
        self
    }

    /// Reinvest all interest; drops any encashment plan
    pub fn reinvest(mut self) -> Self {
        self.config.disposition = InterestDisposition::Reinvest;
        self.config.encashment = None;
        self
    }

    /// Encash `percentage` of the interest from `start`
    pub fn encash(mut self, start: PeriodTarget, timing: Timing, percentage: f64) -> Self {
        self.config.disposition = InterestDisposition::Encash;
        self.config.encashment = Some(EncashmentPlan {
            start,
            timing,
            percentage,
        });
        self
    }

    /// Level contribution with no growth and no stop
    pub fn contribution(
        mut self,
        amount: f64,
        frequency: ContributionFrequency,
        timing: Timing,
    ) -> Self {
        self.config.contribution = Some(ContributionPlan {
            amount,
            frequency,
            timing,
            growth_rate: 0.0,
            growth_frequency_months: 12,
            stop: None,
        });
        self
    }

    /// Grow the contribution by `rate` every `every_months`.
    /// Has no effect before a contribution is set.
    pub fn contribution_growth(mut self, rate: f64, every_months: u32) -> Self {
        if let Some(plan) = self.config.contribution.as_mut() {
            plan.growth_rate = rate;
            plan.growth_frequency_months = every_months;
        }
        self
    }

    /// Stop contributing at `period`. Has no effect before a contribution is set.
    pub fn stop_contributions(mut self, period: PeriodTarget, timing: Timing) -> Self {
        if let Some(plan) = self.config.contribution.as_mut() {
            plan.stop = Some(StopPolicy { period, timing });
        }
        self
    }

    /// Tax rate as a percentage
    pub fn tax(mut self, rate: f64, base: TaxBase) -> Self {
        self.config.tax = TaxTreatment { rate, base };
        self
    }

    /// Inflation rate as a percentage
    pub fn inflation(mut self, rate: f64) -> Self {
        self.config.inflation_rate = rate;
        self
    }

    /// Validate and return the configuration
    pub fn build(self) -> Result<Configuration, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
