//! Configuration data structures for a projection run

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// How often interest is compounded during a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    /// Continuous compounding (e^rt)
    Continuous,
    /// Once a year
    Annually,
    /// Twice a year
    Semiannually,
    /// Four times a year
    Quarterly,
    /// Twelve times a year
    Monthly,
    /// Twice a month (24 per year)
    Bimonthly,
    /// Every two weeks (26 per year)
    Biweekly,
    /// Every week (52 per year)
    Weekly,
    /// Every day (365 per year)
    Daily,
}

impl CompoundingFrequency {
    /// Number of discrete compounding periods per year, `None` for continuous
    pub fn periods_per_year(&self) -> Option<u32> {
        match self {
            CompoundingFrequency::Continuous => None,
            CompoundingFrequency::Annually => Some(1),
            CompoundingFrequency::Semiannually => Some(2),
            CompoundingFrequency::Quarterly => Some(4),
            CompoundingFrequency::Monthly => Some(12),
            CompoundingFrequency::Bimonthly => Some(24),
            CompoundingFrequency::Biweekly => Some(26),
            CompoundingFrequency::Weekly => Some(52),
            CompoundingFrequency::Daily => Some(365),
        }
    }

    /// Map a raw periods-per-year count to a frequency.
    ///
    /// `0` selects continuous compounding, matching the calculator form.
    pub fn from_periods_per_year(periods: u32) -> Result<Self, ConfigError> {
        match periods {
            0 => Ok(CompoundingFrequency::Continuous),
            1 => Ok(CompoundingFrequency::Annually),
            2 => Ok(CompoundingFrequency::Semiannually),
            4 => Ok(CompoundingFrequency::Quarterly),
            12 => Ok(CompoundingFrequency::Monthly),
            24 => Ok(CompoundingFrequency::Bimonthly),
            26 => Ok(CompoundingFrequency::Biweekly),
            52 => Ok(CompoundingFrequency::Weekly),
            365 => Ok(CompoundingFrequency::Daily),
            other => Err(ConfigError::InvalidCompoundingFrequency { periods: other }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompoundingFrequency::Continuous => "continuous",
            CompoundingFrequency::Annually => "annually",
            CompoundingFrequency::Semiannually => "semiannually",
            CompoundingFrequency::Quarterly => "quarterly",
            CompoundingFrequency::Monthly => "monthly",
            CompoundingFrequency::Bimonthly => "bimonthly",
            CompoundingFrequency::Biweekly => "biweekly",
            CompoundingFrequency::Weekly => "weekly",
            CompoundingFrequency::Daily => "daily",
        }
    }
}

/// What happens to interest at each compounding event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterestDisposition {
    /// Interest is folded back into the balance
    Reinvest,
    /// Interest is (partly) withdrawn once encashing has started
    Encash,
}

impl InterestDisposition {
    pub fn is_encash(&self) -> bool {
        matches!(self, InterestDisposition::Encash)
    }
}

impl FromStr for InterestDisposition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reinvest" => Ok(InterestDisposition::Reinvest),
            "encash" => Ok(InterestDisposition::Encash),
            other => Err(ConfigError::UnknownOption {
                field: "interest disposition",
                value: other.to_string(),
            }),
        }
    }
}

/// Position of an event relative to the period it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    Start,
    End,
}

impl Timing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timing::Start => "start",
            Timing::End => "end",
        }
    }
}

impl FromStr for Timing {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(Timing::Start),
            "end" => Ok(Timing::End),
            other => Err(ConfigError::UnknownOption {
                field: "timing",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Timing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How often a contribution is paid in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionFrequency {
    /// One payment of `amount` every month
    Monthly,
    /// One lump sum of twelve monthly amounts every year
    Yearly,
}

impl FromStr for ContributionFrequency {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" | "month" => Ok(ContributionFrequency::Monthly),
            "yearly" | "year" | "annually" => Ok(ContributionFrequency::Yearly),
            other => Err(ConfigError::UnknownOption {
                field: "contribution frequency",
                value: other.to_string(),
            }),
        }
    }
}

/// A point in the horizon, addressed by year or by a month within a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodTarget {
    /// Year N (1-indexed)
    Year(u32),
    /// Month M (1-12) of year N (1-indexed)
    Month { year: u32, month: u32 },
}

impl PeriodTarget {
    pub fn year(&self) -> u32 {
        match self {
            PeriodTarget::Year(year) => *year,
            PeriodTarget::Month { year, .. } => *year,
        }
    }

    /// Build a target from an optional month, as the CSV and CLI inputs carry it
    pub fn from_parts(year: u32, month: Option<u32>) -> Self {
        match month {
            Some(month) => PeriodTarget::Month { year, month },
            None => PeriodTarget::Year(year),
        }
    }

    fn validate(&self, field: &'static str, horizon_years: u32) -> Result<(), ConfigError> {
        let year = self.year();
        if year < 1 || year > horizon_years {
            return Err(ConfigError::YearOutOfRange {
                field,
                year,
                horizon: horizon_years,
            });
        }
        if let PeriodTarget::Month { month, .. } = self {
            if !(1..=12).contains(month) {
                return Err(ConfigError::MonthOutOfRange {
                    field,
                    month: *month,
                });
            }
        }
        Ok(())
    }
}

/// When contributions stop for good
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopPolicy {
    pub period: PeriodTarget,
    pub timing: Timing,
}

/// Periodic contributions paid on top of the principal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionPlan {
    /// Amount per month (yearly plans pay twelve of these at once)
    pub amount: f64,

    pub frequency: ContributionFrequency,

    /// Whether the payment lands before or after the month's interest
    pub timing: Timing,

    /// Fractional increase applied every `growth_frequency_months`
    #[serde(default)]
    pub growth_rate: f64,

    #[serde(default = "default_growth_frequency_months")]
    pub growth_frequency_months: u32,

    #[serde(default)]
    pub stop: Option<StopPolicy>,
}

fn default_growth_frequency_months() -> u32 {
    12
}

/// When and how much accrued interest is withdrawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EncashmentPlan {
    pub start: PeriodTarget,
    pub timing: Timing,

    /// Share of the bucket withdrawn at each compounding event, 1-100
    #[serde(default = "default_encash_percentage")]
    pub percentage: f64,
}

fn default_encash_percentage() -> f64 {
    100.0
}

/// What the tax rate is applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaxBase {
    /// Tax the final balance as a whole
    WholeBalance,
    /// Tax only interest earned (reinvested and encashed)
    #[default]
    InterestOnly,
}

impl FromStr for TaxBase {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "whole" | "whole_balance" | "balance" => Ok(TaxBase::WholeBalance),
            "interest" | "interest_only" => Ok(TaxBase::InterestOnly),
            other => Err(ConfigError::UnknownOption {
                field: "tax base",
                value: other.to_string(),
            }),
        }
    }
}

/// Flat tax applied to the final figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TaxTreatment {
    /// Percentage, 0-100
    #[serde(default)]
    pub rate: f64,
    #[serde(default)]
    pub base: TaxBase,
}

/// Longest supported investment period in years
pub const MAX_HORIZON_YEARS: u32 = 1_000;

/// Full description of one projection request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Initial balance
    pub principal: f64,

    /// Annual nominal rate as a fraction (0.06 for 6%)
    pub annual_rate: f64,

    /// Number of simulated years
    pub horizon_years: u32,

    pub compounding: CompoundingFrequency,

    pub disposition: InterestDisposition,

    #[serde(default)]
    pub contribution: Option<ContributionPlan>,

    /// Required when `disposition` is `Encash`
    #[serde(default)]
    pub encashment: Option<EncashmentPlan>,

    #[serde(default)]
    pub tax: TaxTreatment,

    /// Annual inflation as a percentage, 0-100
    #[serde(default)]
    pub inflation_rate: f64,
}

/// Calculator form defaults: 10,000 at 5% compounded monthly for 10 years,
/// interest reinvested, no contributions, no tax or inflation
impl Default for Configuration {
    fn default() -> Self {
        Self {
            principal: 10_000.0,
            annual_rate: 0.05,
            horizon_years: 10,
            compounding: CompoundingFrequency::Monthly,
            disposition: InterestDisposition::Reinvest,
            contribution: None,
            encashment: None,
            tax: TaxTreatment::default(),
            inflation_rate: 0.0,
        }
    }
}

impl Configuration {
    /// Total number of simulated months
    pub fn horizon_months(&self) -> u32 {
        self.horizon_years * 12
    }

    /// Check every invariant, failing on the first violation
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horizon_years < 1 {
            return Err(ConfigError::HorizonTooShort {
                years: self.horizon_years,
            });
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ConfigError::HorizonTooLong {
                years: self.horizon_years,
                max: MAX_HORIZON_YEARS,
            });
        }
        non_negative("principal", self.principal)?;
        non_negative("annual interest rate", self.annual_rate)?;
        percentage("tax rate", self.tax.rate, 0.0)?;
        percentage("inflation rate", self.inflation_rate, 0.0)?;

        if let Some(plan) = &self.contribution {
            non_negative("contribution amount", plan.amount)?;
            non_negative("contribution growth rate", plan.growth_rate)?;
            if plan.growth_frequency_months < 1 {
                return Err(ConfigError::GrowthFrequencyZero);
            }
            if let Some(stop) = &plan.stop {
                stop.period.validate("stop contribution", self.horizon_years)?;
            }
        }

        match (self.disposition, &self.encashment) {
            (InterestDisposition::Encash, Some(plan)) => {
                plan.start.validate("encash start", self.horizon_years)?;
                percentage("encash percentage", plan.percentage, 1.0)?;
            }
            (InterestDisposition::Encash, None) => return Err(ConfigError::MissingEncashment),
            (InterestDisposition::Reinvest, Some(_)) => {
                return Err(ConfigError::EncashmentWithoutEncash)
            }
            (InterestDisposition::Reinvest, None) => {}
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NegativeAmount { field, value })
    }
}

fn percentage(field: &'static str, value: f64, min: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons
    if value >= min && value <= 100.0 {
        Ok(())
    } else {
        Err(ConfigError::PercentageOutOfRange {
            field,
            value,
            min,
            max: 100.0,
        })
    }
}
