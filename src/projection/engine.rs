//! Core projection engine for loan, savings and drawdown scenarios

use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::frequency::{rate_per_period, rescale_cash_flow};
use crate::scenario::ScenarioInput;
use super::records::{summarize_years, Depletion, LoanSummary, ProjectionResult};
use super::schedule::{CashFlow, Schedule, ScheduleBuilder, StopCondition, StopReason};
use super::stats;

/// Which simulation a scenario runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    /// Savings growth with contributions over a fixed horizon
    #[serde(alias = "savings", alias = "investment")]
    Accumulation,
    /// Level-payment loan payoff, optionally accelerated by extra principal
    #[serde(alias = "loan", alias = "mortgage")]
    Amortization,
    /// Inflation-indexed withdrawals until the horizon or depletion
    #[serde(alias = "withdrawal", alias = "retirement")]
    Drawdown,
}

impl ProjectionMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectionMode::Accumulation => "accumulation",
            ProjectionMode::Amortization => "amortization",
            ProjectionMode::Drawdown => "drawdown",
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProjectionMode {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "accumulation" | "savings" | "investment" => Ok(ProjectionMode::Accumulation),
            "amortization" | "loan" | "mortgage" => Ok(ProjectionMode::Amortization),
            "drawdown" | "withdrawal" | "retirement" => Ok(ProjectionMode::Drawdown),
            other => Err(ProjectionError::invalid("mode", format!("unknown projection mode `{}`", other))),
        }
    }
}

/// Configuration for a projection run
#[derive(Debug, Clone)]
pub struct ProjectionConfig {
    /// A loan schedule is cut off after this many multiples of its scheduled term
    pub payoff_period_multiplier: u32,

    /// Whether to keep every period record (year summaries are always kept)
    pub detailed_output: bool,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            payoff_period_multiplier: 2,
            detailed_output: true,
        }
    }
}

/// Main projection engine
#[derive(Debug, Clone, Default)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Validate `scenario` and run it in `mode`
    pub fn project(&self, scenario: &ScenarioInput, mode: ProjectionMode) -> Result<ProjectionResult> {
        scenario.validate(mode)?;
        debug!(
            "projecting {} scenario: principal={:.2} rate={} horizon={}y",
            mode, scenario.principal, scenario.annual_rate, scenario.horizon_years
        );

        match mode {
            ProjectionMode::Accumulation => Ok(self.accumulate(scenario)),
            ProjectionMode::Amortization => self.amortize(scenario),
            ProjectionMode::Drawdown => Ok(self.draw_down(scenario)),
        }
    }

    fn accumulate(&self, scenario: &ScenarioInput) -> ProjectionResult {
        let periods_per_year = scenario.compounding_periods_per_year;
        let rate = rate_per_period(scenario.annual_rate, periods_per_year);
        let contribution = rescale_cash_flow(
            scenario.periodic_cash_flow,
            scenario.cash_flow_periods_per_year,
            periods_per_year,
        );

        let schedule = ScheduleBuilder::new(rate, scenario.scheduled_periods(periods_per_year))
            .build(scenario.principal, CashFlow::Level(contribution));

        self.finish(ProjectionMode::Accumulation, scenario, periods_per_year, rate, schedule)
    }

    fn amortize(&self, scenario: &ScenarioInput) -> Result<ProjectionResult> {
        // Loans run on the payment grid
        let periods_per_year = scenario.cash_flow_periods_per_year;
        let rate = rate_per_period(scenario.annual_rate, periods_per_year);
        let scheduled_periods = scenario.scheduled_periods(periods_per_year);
        let payment = stats::level_payment(scenario.principal, rate, scheduled_periods)?;
        let extra = scenario.extra_principal_payment;

        let builder = ScheduleBuilder::new(rate, self.payoff_period_bound(scheduled_periods))
            .stop_when(StopCondition::Payoff);

        let schedule = builder.build(scenario.principal, CashFlow::Level(-(payment + extra)));
        if schedule.stop_reason == StopReason::PeriodLimit {
            warn!(
                "loan schedule hit its {}-period bound with {:.2} outstanding",
                builder.max_periods(),
                schedule.terminal_balance(scenario.principal)
            );
        }

        let actual_interest = schedule.total_interest();
        let actual_periods = schedule.len() as u32;
        let (baseline_interest, baseline_periods) = if extra > 0.0 {
            let baseline = builder.build(scenario.principal, CashFlow::Level(-payment));
            (baseline.total_interest(), baseline.len() as u32)
        } else {
            (actual_interest, actual_periods)
        };

        let total_paid: f64 = -schedule.records.iter().map(|r| r.cash_flow).sum::<f64>();
        let loan = LoanSummary {
            level_payment: payment,
            extra_payment: extra,
            scheduled_periods,
            period_bound: builder.max_periods(),
            payoff_periods: actual_periods,
            total_paid,
            baseline_total_interest: baseline_interest,
            interest_saved: baseline_interest - actual_interest,
            time_saved_periods: baseline_periods.saturating_sub(actual_periods),
        };

        let mut result = self.finish(ProjectionMode::Amortization, scenario, periods_per_year, rate, schedule);
        result.loan = Some(loan);
        Ok(result)
    }

    /// Safety bound for a loan schedule of `scheduled_periods` payments
    fn payoff_period_bound(&self, scheduled_periods: u32) -> u32 {
        scheduled_periods.saturating_mul(self.config.payoff_period_multiplier.max(1))
    }

    fn draw_down(&self, scenario: &ScenarioInput) -> ProjectionResult {
        let periods_per_year = scenario.compounding_periods_per_year;
        let rate = rate_per_period(scenario.annual_rate, periods_per_year);
        let base_withdrawal = rescale_cash_flow(
            scenario.periodic_cash_flow,
            scenario.cash_flow_periods_per_year,
            periods_per_year,
        );
        let growth_per_period = rate_per_period(scenario.inflation_rate.unwrap_or(0.0), periods_per_year);

        let schedule = ScheduleBuilder::new(rate, scenario.scheduled_periods(periods_per_year))
            .stop_when(StopCondition::Depletion)
            .build(
                scenario.principal,
                CashFlow::Growing {
                    base: base_withdrawal,
                    growth_per_period,
                },
            );

        let depletion = schedule.depletion_fraction.map(|fraction| {
            let periods_elapsed = (schedule.len() - 1) as f64 + fraction;
            let years_elapsed = periods_elapsed / periods_per_year as f64;
            Depletion {
                periods_elapsed,
                years_elapsed,
                age: scenario.start_age.map(|age| age + years_elapsed),
            }
        });
        if let Some(d) = &depletion {
            debug!("drawdown depleted after {:.2} years", d.years_elapsed);
        }

        let mut result = self.finish(ProjectionMode::Drawdown, scenario, periods_per_year, rate, schedule);
        result.depletion = depletion;
        result
    }

    /// Totals and derived statistics shared by every mode
    fn finish(
        &self,
        mode: ProjectionMode,
        scenario: &ScenarioInput,
        periods_per_year: u32,
        rate: f64,
        schedule: Schedule,
    ) -> ProjectionResult {
        let (total_contributions, total_withdrawals) =
            schedule.records.iter().fold((0.0, 0.0), |(inflow, outflow), r| {
                if r.cash_flow >= 0.0 {
                    (inflow + r.cash_flow, outflow)
                } else {
                    (inflow, outflow - r.cash_flow)
                }
            });

        let terminal_balance = schedule.terminal_balance(scenario.principal);
        let period_count = schedule.len() as u32;
        let elapsed_years = period_count as f64 / periods_per_year as f64;

        let years = summarize_years(&schedule.records, periods_per_year);
        let total_interest = schedule.total_interest();
        let periods = if self.config.detailed_output {
            schedule.records
        } else {
            Vec::new()
        };

        ProjectionResult {
            mode,
            periods_per_year,
            rate_per_period: rate,
            initial_balance: scenario.principal,
            terminal_balance,
            total_interest,
            total_contributions,
            total_withdrawals,
            period_count,
            stop_reason: schedule.stop_reason,
            years,
            periods,
            effective_annual_rate: stats::effective_annual_rate(rate, periods_per_year),
            doubling_time_years: stats::doubling_time_rule_of_72(scenario.annual_rate),
            inflation_adjusted_value: scenario
                .inflation_rate
                .map(|inflation| stats::inflation_adjusted_value(terminal_balance, inflation, elapsed_years)),
            loan: None,
            depletion: None,
        }
    }
}

/// Run a projection with the default configuration
pub fn project(scenario: &ScenarioInput, mode: ProjectionMode) -> Result<ProjectionResult> {
    ProjectionEngine::default().project(scenario, mode)
}
