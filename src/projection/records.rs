//! Output records produced by a projection

use serde::{Deserialize, Serialize};

use super::summary::Summary;

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    // Timing
    pub month: u32,
    pub year: u32,
    pub month_in_year: u32,

    /// Balance carried in from the previous month, before any contribution
    pub opening_balance: f64,

    /// Interest base snapshot, after a start-of-month contribution
    pub starting_balance: f64,

    pub contribution: f64,
    pub interest: f64,
    pub encashed: f64,
    pub ending_balance: f64,

    // Running totals after this month
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
    pub cumulative_encashed: f64,

    /// Growth-adjusted monthly contribution in effect, paid or not
    pub contribution_amount: f64,
}

/// Rollup of the months of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyRecord {
    pub year: u32,
    pub starting_balance: f64,
    pub interest: f64,
    pub contributions: f64,
    pub encashed: f64,
    pub ending_balance: f64,

    // Running totals at year end
    pub cumulative_contributions: f64,
    pub cumulative_interest: f64,
    pub cumulative_encashed: f64,
}

/// One point of the growth chart: the start of the projection or a year end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthPoint {
    pub label: String,
    pub balance: f64,
    pub contributions: f64,
    pub interest: f64,
    pub encashed: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub monthly: Vec<MonthlyRecord>,
    pub yearly: Vec<YearlyRecord>,
    pub summary: Summary,
}

impl ProjectionResult {
    /// Monthly records belonging to `year` (1-indexed)
    pub fn months_of_year(&self, year: u32) -> &[MonthlyRecord] {
        let start = (year.saturating_sub(1) as usize * 12).min(self.monthly.len());
        let end = (start + 12).min(self.monthly.len());
        &self.monthly[start..end]
    }

    /// Cumulative series for a growth chart, starting with the opening balance
    pub fn growth_series(&self) -> Vec<GrowthPoint> {
        let opening = self
            .monthly
            .first()
            .map(|m| m.opening_balance)
            .unwrap_or(0.0);

        std::iter::once(GrowthPoint {
            label: "Start".to_string(),
            balance: opening,
            contributions: 0.0,
            interest: 0.0,
            encashed: 0.0,
        })
        .chain(self.yearly.iter().map(|y| GrowthPoint {
            label: format!("Year {}", y.year),
            balance: y.ending_balance,
            contributions: y.cumulative_contributions,
            interest: y.cumulative_interest,
            encashed: y.cumulative_encashed,
        }))
        .collect()
    }
}
