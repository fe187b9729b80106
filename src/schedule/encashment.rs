//! Encashment policy: when accrued interest starts being withdrawn

use std::fmt;

use crate::config::{EncashmentPlan, PeriodTarget, Timing};

use super::describe_period;

/// Decides, per compounding event, whether the bucket is withdrawn and how it splits
#[derive(Debug, Clone, Copy)]
pub struct EncashmentPolicy {
    plan: EncashmentPlan,
    first_month: u32,
}

impl EncashmentPolicy {
    pub fn new(plan: &EncashmentPlan) -> Self {
        let first_month = match (plan.start, plan.timing) {
            // year >= Y
            (PeriodTarget::Year(year), Timing::Start) => (year - 1) * 12 + 1,
            // year > Y
            (PeriodTarget::Year(year), Timing::End) => year * 12 + 1,
            (PeriodTarget::Month { year, month }, Timing::Start) => (year - 1) * 12 + month,
            (PeriodTarget::Month { year, month }, Timing::End) => (year - 1) * 12 + month + 1,
        };
        Self {
            plan: *plan,
            first_month,
        }
    }

    pub fn plan(&self) -> &EncashmentPlan {
        &self.plan
    }

    /// First month whose compounding event withdraws interest
    pub fn first_encash_month(&self) -> u32 {
        self.first_month
    }

    pub fn should_encash(&self, month: u32) -> bool {
        month >= self.first_month
    }

    /// Split a bucket into (encashed, reinvested).
    /// At 100% the reinvested part is exactly zero.
    pub fn split(&self, bucket: f64) -> (f64, f64) {
        let encashed = bucket * (self.plan.percentage / 100.0);
        (encashed, bucket - encashed)
    }
}

impl fmt::Display for EncashmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Interest will compound until the {}",
            describe_period(&self.plan.start, self.plan.timing)
        )?;
        let percentage = self.plan.percentage;
        if percentage >= 100.0 {
            write!(f, ", then be encashed at each compounding event.")
        } else {
            write!(
                f,
                ", then {}% will be encashed and {}% reinvested at each compounding event.",
                percentage,
                100.0 - percentage
            )
        }
    }
}
