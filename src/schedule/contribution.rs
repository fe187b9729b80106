//! Contribution schedule: which months pay in, and how much

use std::fmt;

use crate::config::{ContributionFrequency, ContributionPlan, PeriodTarget, StopPolicy, Timing};

use super::describe_period;

/// Answers "how much is contributed this month" for a contribution plan
#[derive(Debug, Clone, Default)]
pub struct ContributionScheduler {
    plan: Option<ContributionPlan>,

    /// Last month in which a contribution may be paid
    stop_threshold: Option<u32>,
}

impl ContributionScheduler {
    pub fn new(plan: Option<&ContributionPlan>) -> Self {
        let stop_threshold = plan.and_then(|p| p.stop).map(|stop| stop_month(&stop));
        Self {
            plan: plan.cloned(),
            stop_threshold,
        }
    }

    /// A scheduler that never contributes
    pub fn none() -> Self {
        Self::default()
    }

    pub fn plan(&self) -> Option<&ContributionPlan> {
        self.plan.as_ref()
    }

    pub fn stop_threshold(&self) -> Option<u32> {
        self.stop_threshold
    }

    /// True for every month strictly after the stop threshold
    pub fn is_stopped(&self, month: u32) -> bool {
        matches!(self.stop_threshold, Some(threshold) if month > threshold)
    }

    /// Growth-adjusted monthly amount for `month`.
    ///
    /// Growth steps are counted from the first month, so the amount never
    /// depends on earlier payments having been made.
    pub fn amount_at(&self, month: u32) -> f64 {
        match &self.plan {
            None => 0.0,
            Some(plan) => {
                let steps = (month.saturating_sub(1) / plan.growth_frequency_months.max(1)) as i32;
                if steps == 0 || plan.growth_rate == 0.0 {
                    plan.amount
                } else {
                    plan.amount * (1.0 + plan.growth_rate).powi(steps)
                }
            }
        }
    }

    /// Amount scheduled for `month` before applying the stop policy
    pub fn scheduled(&self, month: u32) -> f64 {
        let Some(plan) = &self.plan else {
            return 0.0;
        };
        match plan.frequency {
            ContributionFrequency::Monthly => self.amount_at(month),
            ContributionFrequency::Yearly => {
                let due_this_month = match plan.timing {
                    Timing::Start => month % 12 == 1,
                    Timing::End => month % 12 == 0,
                };
                if due_this_month {
                    self.amount_at(month) * 12.0
                } else {
                    0.0
                }
            }
        }
    }

    /// Contribution paid at the `timing` point of `month`, zero when none is due
    pub fn due(&self, month: u32, timing: Timing) -> f64 {
        match &self.plan {
            Some(plan) if plan.timing == timing && !self.is_stopped(month) => self.scheduled(month),
            _ => 0.0,
        }
    }
}

/// Convert a stop policy into the last contributing month.
///
/// Stopping at the start of a period means the period itself receives
/// nothing; stopping at its end means it is the last one paid.
fn stop_month(stop: &StopPolicy) -> u32 {
    match (stop.period, stop.timing) {
        (PeriodTarget::Year(year), Timing::Start) => (year - 1) * 12,
        (PeriodTarget::Year(year), Timing::End) => year * 12,
        (PeriodTarget::Month { year, month }, Timing::Start) => (year - 1) * 12 + month - 1,
        (PeriodTarget::Month { year, month }, Timing::End) => (year - 1) * 12 + month,
    }
}

impl fmt::Display for StopPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Contributions will continue until the {}, then stop. Investment growth continues without new contributions.",
            describe_period(&self.period, self.timing)
        )
    }
}
