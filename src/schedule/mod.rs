//! Per-month schedules consulted by the projection engine

mod rates;
mod contribution;
mod encashment;

pub use rates::RateConverter;
pub use contribution::ContributionScheduler;
pub use encashment::EncashmentPolicy;

use crate::config::{PeriodTarget, Timing};

/// Human-readable form of a period boundary, e.g. "start of March in year 2"
pub fn describe_period(target: &PeriodTarget, timing: Timing) -> String {
    match target {
        PeriodTarget::Year(year) => format!("{} of year {}", timing, year),
        PeriodTarget::Month { year, month } => {
            let name = u8::try_from(*month)
                .ok()
                .and_then(|m| chrono::Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_else(|| format!("month {}", month));
            format!("{} of {} in year {}", timing, name, year)
        }
    }
}
