//! Core projection engine for month-by-month balance projections

use log::debug;

use crate::config::{ConfigError, Configuration, InterestDisposition, Timing};
use crate::schedule::{ContributionScheduler, EncashmentPolicy, RateConverter};
use super::records::{MonthlyRecord, ProjectionResult};
use super::state::SimulationState;
use super::summary::SummaryAggregator;

/// Main projection engine
///
/// Holds a validated configuration and the schedules derived from it. A run
/// owns its own [`SimulationState`], so one engine can be shared across
/// threads and run any number of times.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: Configuration,
    rates: RateConverter,
    contributions: ContributionScheduler,
    encashment: Option<EncashmentPolicy>,
}

impl ProjectionEngine {
    /// Validate the configuration and prepare its schedules
    pub fn new(config: Configuration) -> Result<Self, ConfigError> {
        config.validate()?;

        let rates = RateConverter::new(config.annual_rate, config.compounding);
        let contributions = ContributionScheduler::new(config.contribution.as_ref());
        let encashment = match config.disposition {
            InterestDisposition::Encash => config.encashment.as_ref().map(EncashmentPolicy::new),
            InterestDisposition::Reinvest => None,
        };

        Ok(Self {
            config,
            rates,
            contributions,
            encashment,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn rates(&self) -> &RateConverter {
        &self.rates
    }

    pub fn contributions(&self) -> &ContributionScheduler {
        &self.contributions
    }

    pub fn encashment(&self) -> Option<&EncashmentPolicy> {
        self.encashment.as_ref()
    }

    /// Run the projection over the whole horizon
    pub fn run(&self) -> ProjectionResult {
        let horizon = self.config.horizon_months();
        debug!(
            "projecting {:.2} at {:.4} ({}) over {} months, disposition {:?}",
            self.config.principal,
            self.config.annual_rate,
            self.config.compounding.as_str(),
            horizon,
            self.config.disposition,
        );

        let mut state = SimulationState::new(self.config.principal);
        let mut monthly = Vec::with_capacity(horizon as usize);
        let mut yearly = Vec::with_capacity(self.config.horizon_years as usize);

        for _month in 1..=horizon {
            state.advance_month();

            let row = self.calculate_month(&mut state);
            monthly.push(row);

            // Close out the year
            if state.month_in_year == 12 {
                let first = monthly.len() - 12;
                yearly.extend(SummaryAggregator::rollup_year(&monthly[first..]));
            }
        }

        self.settle_residual(&mut state);

        let summary = SummaryAggregator::new(&self.config)
            .summarize(&state, self.rates.effective_annual_rate());

        debug!(
            "projection complete: final balance {:.2}, interest {:.2}, encashed {:.2}",
            summary.final_balance, summary.total_interest_earned, summary.total_encashed_interest
        );

        ProjectionResult {
            monthly,
            yearly,
            summary,
        }
    }

    /// Apply one month: start contribution, interest, end contribution, compounding
    fn calculate_month(&self, state: &mut SimulationState) -> MonthlyRecord {
        let month = state.month;
        let opening_balance = state.last_ending_balance;

        state.current_contribution_amount = self.contributions.amount_at(month);

        // Start-of-month contribution becomes part of this month's interest base
        let start_contribution = self.contributions.due(month, Timing::Start);
        state.contribute(start_contribution);
        let starting_balance = state.balance;

        // Under Encash the bucket never earns interest of its own
        let base = match self.config.disposition {
            InterestDisposition::Reinvest => starting_balance + state.interest_bucket,
            InterestDisposition::Encash => starting_balance,
        };
        let interest = self.rates.monthly_interest(base);
        state.accrue(interest);

        let end_contribution = self.contributions.due(month, Timing::End);
        state.contribute(end_contribution);

        let encashed = if self.rates.is_compounding_event(month) {
            self.settle_bucket(state, month)
        } else {
            0.0
        };

        // Unfolded interest shows in the balance unless it is headed for withdrawal
        let ending_balance = if self.is_encashing(month) {
            state.balance
        } else {
            state.balance_with_bucket()
        };
        state.last_ending_balance = ending_balance;

        MonthlyRecord {
            month,
            year: state.year,
            month_in_year: state.month_in_year,
            opening_balance,
            starting_balance,
            contribution: start_contribution + end_contribution,
            interest,
            encashed,
            ending_balance,
            cumulative_contributions: state.total_contributions,
            cumulative_interest: state.total_interest_earned,
            cumulative_encashed: state.total_encashed_interest,
            contribution_amount: state.current_contribution_amount,
        }
    }

    fn is_encashing(&self, month: u32) -> bool {
        self.encashment
            .as_ref()
            .is_some_and(|policy| policy.should_encash(month))
    }

    /// Fold or split the bucket at a compounding event, returning the amount encashed
    fn settle_bucket(&self, state: &mut SimulationState, month: u32) -> f64 {
        match &self.encashment {
            Some(policy) if policy.should_encash(month) => {
                let (encashed, reinvested) = policy.split(state.interest_bucket);
                state.settle_bucket(encashed, reinvested);
                encashed
            }
            _ => {
                state.fold_bucket();
                0.0
            }
        }
    }

    /// Interest left in the bucket after the last month is settled like any event
    fn settle_residual(&self, state: &mut SimulationState) {
        if state.interest_bucket != 0.0 {
            let residual = state.interest_bucket;
            let encashed = self.settle_bucket(state, state.month);
            debug!(
                "settled residual bucket {:.6} after month {} ({:.6} encashed)",
                residual, state.month, encashed
            );
        }
    }
}

/// Validate `config` and run it once
pub fn project(config: &Configuration) -> Result<ProjectionResult, ConfigError> {
    Ok(ProjectionEngine::new(config.clone())?.run())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{
        CompoundingFrequency, ConfigurationBuilder, ContributionFrequency, PeriodTarget, TaxBase,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::new()
            .principal(10_000.0)
            .annual_rate(0.06)
            .horizon_years(1)
            .compounding(CompoundingFrequency::Monthly)
    }

    fn run(config: Configuration) -> ProjectionResult {
        ProjectionEngine::new(config).unwrap().run()
    }

    fn assert_conserved(result: &ProjectionResult) {
        let s = &result.summary;
        assert_relative_eq!(
            s.final_balance + s.total_encashed_interest - s.total_invested,
            s.total_interest_earned,
            epsilon = 1e-6,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_projection_runs() {
        let result = run(builder().horizon_years(3).build().unwrap());
        assert_eq!(result.monthly.len(), 36);
        assert_eq!(result.yearly.len(), 3);
        assert_eq!(result.monthly[0].month, 1);
        assert_eq!(result.monthly[35].year, 3);
        assert_eq!(result.monthly[35].month_in_year, 12);
    }

    #[test]
    fn test_monthly_compounding_one_year() {
        let result = run(builder().build().unwrap());
        for row in &result.monthly {
            assert_relative_eq!(row.interest, row.starting_balance * 0.005, epsilon = 1e-9);
        }
        assert_relative_eq!(
            result.summary.final_balance,
            10_000.0 * 1.005_f64.powi(12),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_annual_compounding_one_year_reaches_nominal_rate() {
        let result = run(builder()
            .compounding(CompoundingFrequency::Annually)
            .build()
            .unwrap());
        let monthly_rate = 1.06_f64.powf(1.0 / 12.0) - 1.0;
        assert_relative_eq!(result.monthly[0].interest, 10_000.0 * monthly_rate, epsilon = 1e-9);
        assert_abs_diff_eq!(result.summary.final_balance, 10_600.0, epsilon = 0.01);
        assert_abs_diff_eq!(result.summary.total_interest_earned, 600.0, epsilon = 0.01);
    }

    #[test]
    fn test_full_encash_keeps_principal() {
        let result = run(builder()
            .encash(PeriodTarget::Year(1), Timing::Start, 100.0)
            .build()
            .unwrap());
        assert_abs_diff_eq!(result.summary.total_encashed_interest, 600.0, epsilon = 0.01);
        assert_abs_diff_eq!(result.summary.final_balance, 10_000.0, epsilon = 1e-6);
        for row in &result.monthly {
            assert_abs_diff_eq!(row.encashed, row.interest, epsilon = 1e-9);
            assert_abs_diff_eq!(row.ending_balance, 10_000.0, epsilon = 1e-6);
        }
        assert_conserved(&result);
    }

    #[test]
    fn test_contributions_with_annual_compounding() {
        let result = run(ConfigurationBuilder::new()
            .principal(0.0)
            .annual_rate(0.05)
            .horizon_years(2)
            .compounding(CompoundingFrequency::Annually)
            .contribution(100.0, ContributionFrequency::Monthly, Timing::Start)
            .build()
            .unwrap());

        assert_eq!(result.summary.total_contributions, 2400.0);
        assert_eq!(result.summary.total_invested, 2400.0);
        assert!(result.summary.final_balance > 2400.0);

        let m = 1.05_f64.powf(1.0 / 12.0) - 1.0;
        let expected: f64 = (1..=24).map(|k| 100.0 * (1.0 + m).powi(k)).sum();
        assert_relative_eq!(result.summary.final_balance, expected, epsilon = 1e-6);
        assert_conserved(&result);
    }

    #[test]
    fn test_reinvest_balance_is_monotonic() {
        let result = run(builder()
            .horizon_years(5)
            .compounding(CompoundingFrequency::Quarterly)
            .contribution(250.0, ContributionFrequency::Monthly, Timing::End)
            .contribution_growth(0.03, 12)
            .stop_contributions(PeriodTarget::Year(4), Timing::Start)
            .build()
            .unwrap());

        let mut previous = 10_000.0;
        for row in &result.monthly {
            assert!(row.ending_balance >= previous, "balance fell in month {}", row.month);
            assert!(row.ending_balance >= row.opening_balance);
            previous = row.ending_balance;
        }
    }

    #[test]
    fn test_conservation_across_configurations() {
        let configs = vec![
            builder().horizon_years(4).compounding(CompoundingFrequency::Quarterly).build(),
            builder()
                .horizon_years(6)
                .compounding(CompoundingFrequency::Semiannually)
                .contribution(1_000.0, ContributionFrequency::Yearly, Timing::End)
                .contribution_growth(0.10, 24)
                .encash(PeriodTarget::Month { year: 2, month: 5 }, Timing::End, 35.0)
                .build(),
            builder()
                .horizon_years(3)
                .compounding(CompoundingFrequency::Continuous)
                .contribution(75.0, ContributionFrequency::Monthly, Timing::Start)
                .stop_contributions(PeriodTarget::Month { year: 2, month: 7 }, Timing::End)
                .encash(PeriodTarget::Year(2), Timing::Start, 100.0)
                .build(),
            builder()
                .horizon_years(2)
                .compounding(CompoundingFrequency::Daily)
                .encash(PeriodTarget::Year(2), Timing::End, 60.0)
                .build(),
        ];

        for config in configs {
            assert_conserved(&run(config.unwrap()));
        }
    }

    #[test]
    fn test_zero_rate_returns_exactly_what_was_invested() {
        let result = run(builder()
            .annual_rate(0.0)
            .horizon_years(3)
            .contribution(125.0, ContributionFrequency::Monthly, Timing::Start)
            .contribution_growth(1.0, 12)
            .build()
            .unwrap());
        assert_eq!(result.summary.total_interest_earned, 0.0);
        assert_eq!(result.summary.final_balance, result.summary.total_invested);
        // 125 * 12 * (1 + 2 + 4)
        assert_eq!(result.summary.total_contributions, 10_500.0);
    }

    #[test]
    fn test_all_zero_run_is_valid() {
        let result = run(builder()
            .principal(0.0)
            .annual_rate(0.0)
            .horizon_years(2)
            .build()
            .unwrap());
        assert_eq!(result.monthly.len(), 24);
        assert!(result.monthly.iter().all(|m| m.ending_balance == 0.0 && m.interest == 0.0));
        assert_eq!(result.summary.final_balance, 0.0);
    }

    #[test]
    fn test_daily_compounding_approaches_continuous() {
        let final_for = |freq| {
            run(builder().horizon_years(10).compounding(freq).build().unwrap())
                .summary
                .final_balance
        };
        let monthly = final_for(CompoundingFrequency::Monthly);
        let daily = final_for(CompoundingFrequency::Daily);
        let continuous = final_for(CompoundingFrequency::Continuous);

        assert!(monthly < daily);
        assert!(daily < continuous);
        assert!((continuous - daily) / continuous < 1e-4);
        assert_relative_eq!(continuous, 10_000.0 * 0.6_f64.exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_zero_encash_percentage_rejected() {
        let config = Configuration {
            disposition: InterestDisposition::Encash,
            encashment: Some(crate::config::EncashmentPlan {
                start: PeriodTarget::Year(1),
                timing: Timing::Start,
                percentage: 0.0,
            }),
            ..builder().build().unwrap()
        };
        assert!(ProjectionEngine::new(config.clone()).is_err());
        assert!(project(&config).is_err());
    }

    #[test]
    fn test_stop_boundary() {
        let result = run(builder()
            .horizon_years(3)
            .contribution(200.0, ContributionFrequency::Monthly, Timing::Start)
            .stop_contributions(PeriodTarget::Month { year: 2, month: 3 }, Timing::End)
            .build()
            .unwrap());
        for row in &result.monthly {
            if row.month <= 15 {
                assert_eq!(row.contribution, 200.0, "month {}", row.month);
            } else {
                assert_eq!(row.contribution, 0.0, "month {}", row.month);
            }
        }
        assert_eq!(result.summary.total_contributions, 3_000.0);
    }

    #[test]
    fn test_yearly_start_contribution_stops_at_start_of_year() {
        let result = run(builder()
            .horizon_years(4)
            .contribution(50.0, ContributionFrequency::Yearly, Timing::Start)
            .stop_contributions(PeriodTarget::Year(3), Timing::Start)
            .build()
            .unwrap());
        let paid: Vec<u32> = result
            .monthly
            .iter()
            .filter(|m| m.contribution > 0.0)
            .map(|m| m.month)
            .collect();
        assert_eq!(paid, vec![1, 13]);
        assert_eq!(result.yearly[0].contributions, 600.0);
        assert_eq!(result.yearly[2].contributions, 0.0);
    }

    #[test]
    fn test_contribution_timing_and_interest_base() {
        let start = run(builder()
            .principal(0.0)
            .contribution(100.0, ContributionFrequency::Monthly, Timing::Start)
            .build()
            .unwrap());
        let end = run(builder()
            .principal(0.0)
            .contribution(100.0, ContributionFrequency::Monthly, Timing::End)
            .build()
            .unwrap());

        assert_relative_eq!(start.monthly[0].interest, 0.5, epsilon = 1e-12);
        assert_eq!(start.monthly[0].starting_balance, 100.0);
        assert_eq!(end.monthly[0].interest, 0.0);
        assert_eq!(end.monthly[0].starting_balance, 0.0);
        assert_eq!(end.monthly[0].ending_balance, 100.0);
        assert!(start.summary.final_balance > end.summary.final_balance);
    }

    #[test]
    fn test_bucket_earns_interest_only_when_reinvested() {
        let reinvest = run(builder()
            .compounding(CompoundingFrequency::Quarterly)
            .build()
            .unwrap());
        let encash = run(builder()
            .compounding(CompoundingFrequency::Quarterly)
            .encash(PeriodTarget::Year(1), Timing::Start, 100.0)
            .build()
            .unwrap());

        assert!(reinvest.monthly[1].interest > reinvest.monthly[0].interest);
        assert_eq!(encash.monthly[1].interest, encash.monthly[0].interest);
        assert_eq!(encash.monthly[2].interest, encash.monthly[0].interest);
    }

    #[test]
    fn test_encashing_waits_for_start_period() {
        let result = run(builder()
            .horizon_years(3)
            .compounding(CompoundingFrequency::Quarterly)
            .encash(PeriodTarget::Month { year: 2, month: 2 }, Timing::Start, 100.0)
            .build()
            .unwrap());

        // Before month 14 every quarter is folded back into the balance
        assert!(result.monthly[..13].iter().all(|m| m.encashed == 0.0));
        assert!(result.monthly[12].ending_balance > 10_000.0);
        // Month 14 is not an event; month 15 is
        assert_eq!(result.monthly[13].encashed, 0.0);
        assert!(result.monthly[14].encashed > 0.0);

        // While encashing, pending interest is not shown in the balance
        let frozen = result.monthly[14].ending_balance;
        assert_eq!(result.monthly[15].ending_balance, frozen);
        assert_eq!(result.summary.final_balance, frozen);
        assert_conserved(&result);
    }

    #[test]
    fn test_pending_interest_shown_until_encashing_starts() {
        let result = run(builder()
            .horizon_years(2)
            .compounding(CompoundingFrequency::Quarterly)
            .encash(PeriodTarget::Year(2), Timing::Start, 100.0)
            .build()
            .unwrap());
        let m = &result.monthly;

        // Year 1 folds each quarter, so the unfolded bucket counts toward the balance
        assert_eq!(m[0].ending_balance, 10_000.0 + m[0].interest);
        assert_eq!(m[1].ending_balance, 10_000.0 + (m[0].interest + m[1].interest));
        assert_eq!(m[0].encashed, 0.0);

        // From month 13 the bucket is headed for withdrawal and excluded
        assert!(m[12].interest > 0.0);
        assert_eq!(m[12].ending_balance, m[11].ending_balance);
        assert_eq!(m[13].ending_balance, m[11].ending_balance);
        assert!(m[14].encashed > 0.0);
        assert_conserved(&result);
    }

    #[test]
    fn test_contribution_amount_tracks_growth() {
        let result = run(builder()
            .horizon_years(3)
            .contribution(100.0, ContributionFrequency::Monthly, Timing::End)
            .contribution_growth(0.10, 12)
            .stop_contributions(PeriodTarget::Year(2), Timing::End)
            .build()
            .unwrap());
        let m = &result.monthly;

        assert_eq!(m[0].contribution_amount, 100.0);
        assert_relative_eq!(m[12].contribution_amount, 110.0, epsilon = 1e-9);
        // Still reported after contributions stop
        assert_eq!(m[24].contribution, 0.0);
        assert_relative_eq!(m[24].contribution_amount, 121.0, epsilon = 1e-9);
    }

    #[test]
    fn test_horizon_beyond_limit_rejected() {
        let config = Configuration {
            horizon_years: crate::config::MAX_HORIZON_YEARS + 1,
            ..builder().build().unwrap()
        };
        assert!(matches!(
            project(&config),
            Err(ConfigError::HorizonTooLong { .. })
        ));
    }

    #[test]
    fn test_partial_encash_splits_each_event() {
        let result = run(builder()
            .horizon_years(2)
            .encash(PeriodTarget::Year(1), Timing::Start, 25.0)
            .build()
            .unwrap());
        for row in &result.monthly {
            assert_relative_eq!(row.encashed, row.interest * 0.25, epsilon = 1e-9);
        }
        assert!(result.summary.final_balance > 10_000.0);
        assert_conserved(&result);
    }

    #[test]
    fn test_yearly_records_match_months() {
        let result = run(builder()
            .horizon_years(4)
            .compounding(CompoundingFrequency::Semiannually)
            .contribution(40.0, ContributionFrequency::Monthly, Timing::End)
            .build()
            .unwrap());

        let total_interest: f64 = result.yearly.iter().map(|y| y.interest).sum();
        assert_relative_eq!(total_interest, result.summary.total_interest_earned, epsilon = 1e-6);

        assert_eq!(result.yearly[0].starting_balance, 10_000.0);
        for pair in result.yearly.windows(2) {
            assert_eq!(pair[1].starting_balance, pair[0].ending_balance);
        }
        assert_eq!(
            result.yearly.last().unwrap().ending_balance,
            result.summary.final_balance
        );
        assert_eq!(result.months_of_year(2).len(), 12);
        assert_eq!(result.months_of_year(2)[0].month, 13);
    }

    #[test]
    fn test_growth_series() {
        let result = run(builder().horizon_years(3).build().unwrap());
        let series = result.growth_series();
        assert_eq!(series.len(), 4);
        assert_eq!(series[0].label, "Start");
        assert_eq!(series[0].balance, 10_000.0);
        assert_eq!(series[3].label, "Year 3");
        assert_eq!(series[3].balance, result.summary.final_balance);
    }

    #[test]
    fn test_summary_adjustments_present_when_configured() {
        let result = run(builder()
            .horizon_years(2)
            .tax(15.0, TaxBase::InterestOnly)
            .inflation(2.0)
            .build()
            .unwrap());
        let s = &result.summary;
        let after_tax = s.final_balance - s.total_interest_earned * 0.15;
        assert_relative_eq!(s.balance_after_tax.unwrap(), after_tax, epsilon = 1e-9);
        assert_relative_eq!(
            s.balance_after_inflation.unwrap(),
            after_tax * 0.98_f64.powi(2),
            epsilon = 1e-9
        );
        assert_relative_eq!(s.effective_annual_rate, 1.005_f64.powi(12) - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_engine_is_reusable() {
        let engine = ProjectionEngine::new(builder().horizon_years(2).build().unwrap()).unwrap();
        let first = engine.run();
        let second = engine.run();
        assert_eq!(first.monthly, second.monthly);
        assert_eq!(first.summary, second.summary);
    }
}
