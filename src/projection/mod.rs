//! Month-by-month projection engine and its output

mod state;
mod engine;
mod records;
mod summary;
pub mod export;

pub use state::SimulationState;
pub use engine::{project, ProjectionEngine};
pub use records::{GrowthPoint, MonthlyRecord, ProjectionResult, YearlyRecord};
pub use summary::{Summary, SummaryAggregator};
