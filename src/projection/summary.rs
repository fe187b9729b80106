//! Yearly rollups and final figures derived from a finished run

use serde::{Deserialize, Serialize};

use crate::config::{Configuration, TaxBase};
use super::records::{MonthlyRecord, YearlyRecord};
use super::state::SimulationState;

/// Final figures for a projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub final_balance: f64,

    /// Principal plus all contributions
    pub total_invested: f64,

    pub total_contributions: f64,
    pub total_interest_earned: f64,
    pub total_encashed_interest: f64,

    /// Present only when a tax rate is set
    pub balance_after_tax: Option<f64>,

    /// Present only when an inflation rate is set
    pub balance_after_inflation: Option<f64>,

    /// Annual growth of a balance with all interest compounded
    pub effective_annual_rate: f64,
}

/// Turns monthly records and final state into yearly rows and a [`Summary`]
#[derive(Debug, Clone, Copy)]
pub struct SummaryAggregator<'a> {
    config: &'a Configuration,
}

impl<'a> SummaryAggregator<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Roll up consecutive months into a year, `None` for an empty slice
    pub fn rollup_year(months: &[MonthlyRecord]) -> Option<YearlyRecord> {
        let first = months.first()?;
        let last = months.last()?;
        Some(YearlyRecord {
            year: first.year,
            starting_balance: first.opening_balance,
            interest: months.iter().map(|m| m.interest).sum(),
            contributions: months.iter().map(|m| m.contribution).sum(),
            encashed: months.iter().map(|m| m.encashed).sum(),
            ending_balance: last.ending_balance,
            cumulative_contributions: last.cumulative_contributions,
            cumulative_interest: last.cumulative_interest,
            cumulative_encashed: last.cumulative_encashed,
        })
    }

    /// Yearly rows for a whole monthly sequence; a trailing partial year is kept
    pub fn yearly_from_monthly(monthly: &[MonthlyRecord]) -> Vec<YearlyRecord> {
        monthly
            .chunks(12)
            .filter_map(Self::rollup_year)
            .collect()
    }

    /// Final figures from the state left after the terminal settlement
    pub fn summarize(&self, state: &SimulationState, effective_annual_rate: f64) -> Summary {
        let final_balance = state.balance_with_bucket();
        let total_invested = self.config.principal + state.total_contributions;

        let balance_after_tax = (self.config.tax.rate > 0.0).then(|| {
            let rate = self.config.tax.rate / 100.0;
            match self.config.tax.base {
                TaxBase::InterestOnly => {
                    let taxable = state.total_interest_earned + state.total_encashed_interest;
                    final_balance - taxable * rate
                }
                TaxBase::WholeBalance => final_balance * (1.0 - rate),
            }
        });

        let balance_after_inflation = (self.config.inflation_rate > 0.0).then(|| {
            let erosion = (1.0 - self.config.inflation_rate / 100.0)
                .powi(self.config.horizon_years as i32);
            balance_after_tax.unwrap_or(final_balance) * erosion
        });

        Summary {
            final_balance,
            total_invested,
            total_contributions: state.total_contributions,
            total_interest_earned: state.total_interest_earned,
            total_encashed_interest: state.total_encashed_interest,
            balance_after_tax,
            balance_after_inflation,
            effective_annual_rate,
        }
    }
}
