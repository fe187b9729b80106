//! Compound Projection - month-by-month compound interest engine
//!
//! This library provides:
//! - Rate conversion for discrete and continuous compounding
//! - Contribution schedules with growth and a stop point
//! - Interest encashment from a chosen year or month, in full or in part
//! - Yearly rollups, tax and inflation adjusted summaries
//! - JSON/CSV configuration loading and a parallel scenario runner

pub mod config;
pub mod schedule;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use config::{Configuration, ConfigurationBuilder, ConfigError};
pub use projection::{project, MonthlyRecord, ProjectionEngine, ProjectionResult, Summary, YearlyRecord};
pub use scenario::{Scenario, ScenarioRunner};
