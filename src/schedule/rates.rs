//! Conversion of an annual nominal rate into monthly interest
//!
//! The projection runs in whole months regardless of compounding frequency,
//! so every frequency is reduced to an effective monthly rate plus the
//! spacing of compounding events in months.

use crate::config::CompoundingFrequency;

/// Monthly interest calculator for one rate/frequency pair
#[derive(Debug, Clone, Copy)]
pub struct RateConverter {
    annual_rate: f64,
    frequency: CompoundingFrequency,
    monthly_rate: f64,
    months_per_event: u32,
}

impl RateConverter {
    pub fn new(annual_rate: f64, frequency: CompoundingFrequency) -> Self {
        let monthly_rate = match frequency.periods_per_year() {
            // e^(r/12) - 1
            None => (annual_rate / 12.0).exp_m1(),
            // (1 + r/n)^(n/12) - 1
            Some(n) => {
                let n = n as f64;
                (1.0 + annual_rate / n).powf(n / 12.0) - 1.0
            }
        };

        // Events must fall on month boundaries. Frequencies finer than
        // monthly, and continuous, fold the bucket every month.
        let months_per_event = match frequency.periods_per_year() {
            Some(n) if n <= 12 && 12 % n == 0 => 12 / n,
            _ => 1,
        };

        Self {
            annual_rate,
            frequency,
            monthly_rate,
            months_per_event,
        }
    }

    pub fn annual_rate(&self) -> f64 {
        self.annual_rate
    }

    pub fn frequency(&self) -> CompoundingFrequency {
        self.frequency
    }

    /// Interest earned over one month on `base`
    pub fn monthly_interest(&self, base: f64) -> f64 {
        base * self.monthly_rate
    }

    pub fn effective_monthly_rate(&self) -> f64 {
        self.monthly_rate
    }

    /// Growth over a full year with all interest compounded
    pub fn effective_annual_rate(&self) -> f64 {
        (1.0 + self.monthly_rate).powi(12) - 1.0
    }

    pub fn months_per_compounding_event(&self) -> u32 {
        self.months_per_event
    }

    /// Whether the bucket is folded or encashed at the end of `month`
    pub fn is_compounding_event(&self, month: u32) -> bool {
        month % self.months_per_event == 0
    }
}
