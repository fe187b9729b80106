//! Error types for configuration validation and loading

use thiserror::Error;

/// A configuration that violates one of the projection invariants.
///
/// Messages are written for end users and can be surfaced verbatim.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("investment period must be at least 1 year, got {years}")]
    HorizonTooShort { years: u32 },

    #[error("investment period must be at most {max} years, got {years}")]
    HorizonTooLong { years: u32, max: u32 },

    #[error("{field} must be a finite, non-negative number, got {value}")]
    NegativeAmount { field: &'static str, value: f64 },

    #[error("please select a valid compounding frequency (got {periods} periods per year)")]
    InvalidCompoundingFrequency { periods: u32 },

    #[error("unknown {field}: {value:?}")]
    UnknownOption { field: &'static str, value: String },

    #[error("{field} must be between {min} and {max}, got {value}")]
    PercentageOutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} year must be between 1 and {horizon} (investment period), got {year}")]
    YearOutOfRange {
        field: &'static str,
        year: u32,
        horizon: u32,
    },

    #[error("{field} month must be between 1 and 12, got {month}")]
    MonthOutOfRange { field: &'static str, month: u32 },

    #[error("contribution growth frequency must be at least 1 month")]
    GrowthFrequencyZero,

    #[error("encashing interest requires an encashment start period")]
    MissingEncashment,

    #[error("an encashment plan only applies when interest is encashed")]
    EncashmentWithoutEncash,
}

/// Failure to read a configuration or scenario file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scenario CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("scenario on line {line} ({name}): {source}")]
    Scenario {
        line: usize,
        name: String,
        #[source]
        source: ConfigError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
