//! Projection configuration: data model, validation, builder and file loaders

mod data;
mod builder;
mod error;
pub mod loader;

pub use data::{
    CompoundingFrequency, Configuration, ContributionFrequency, ContributionPlan, EncashmentPlan,
    InterestDisposition, PeriodTarget, StopPolicy, TaxBase, TaxTreatment, Timing, MAX_HORIZON_YEARS,
};
pub use builder::ConfigurationBuilder;
pub use error::{ConfigError, LoadError};
