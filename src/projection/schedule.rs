//! Bounded period-by-period schedule construction

use serde::{Deserialize, Serialize};

use super::records::PeriodRecord;
use super::simulator;

/// Absolute residual below which a loan balance counts as retired
pub const BALANCE_EPSILON: f64 = 1e-6;

/// Hard ceiling on the periods one schedule run may simulate
pub const MAX_SIMULATED_PERIODS: u32 = 1_000_000;

/// Residual tolerance relative to the opening balance, for large principals
const RELATIVE_EPSILON: f64 = 1e-12;

/// Condition checked after every period, in addition to the period bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCondition {
    /// Run until `max_periods`
    Horizon,
    /// Stop once the balance reaches zero; the final withdrawal is capped
    Depletion,
    /// Stop once a payment retires the balance; the final payment is capped
    Payoff,
}

/// Why a schedule ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    HorizonReached,
    Depleted,
    PaidOff,
    /// A payoff run used up its safety bound without retiring the balance
    PeriodLimit,
}

/// Cash flow applied at the end of each period
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CashFlow {
    Level(f64),
    /// `base * (1 + growth_per_period)^t` for zero-based period `t`
    Growing { base: f64, growth_per_period: f64 },
}

impl CashFlow {
    pub fn amount_at(&self, period: u32) -> f64 {
        match *self {
            CashFlow::Level(amount) => amount,
            CashFlow::Growing { base, growth_per_period } => {
                base * (1.0 + growth_per_period).powi(period as i32)
            }
        }
    }
}

/// Records produced by one schedule run
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub records: Vec<PeriodRecord>,
    pub stop_reason: StopReason,

    /// Position of the zero crossing within the final period (0..=1), set on depletion
    pub depletion_fraction: Option<f64>,
}

impl Schedule {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_interest(&self) -> f64 {
        self.records.last().map(|r| r.cumulative_interest).unwrap_or(0.0)
    }

    pub fn terminal_balance(&self, initial_balance: f64) -> f64 {
        self.records.last().map(|r| r.closing_balance).unwrap_or(initial_balance)
    }
}

/// Drives the period simulator across at most `max_periods` periods,
/// never more than `MAX_SIMULATED_PERIODS`
#[derive(Debug, Clone)]
pub struct ScheduleBuilder {
    rate_per_period: f64,
    max_periods: u32,
    stop: StopCondition,
}

impl ScheduleBuilder {
    pub fn new(rate_per_period: f64, max_periods: u32) -> Self {
        Self {
            rate_per_period,
            max_periods: max_periods.min(MAX_SIMULATED_PERIODS),
            stop: StopCondition::Horizon,
        }
    }

    pub fn stop_when(mut self, stop: StopCondition) -> Self {
        self.stop = stop;
        self
    }

    pub fn max_periods(&self) -> u32 {
        self.max_periods
    }

    /// Run the schedule from `initial_balance`
    pub fn build(&self, initial_balance: f64, cash_flow: CashFlow) -> Schedule {
        let payoff_tolerance = BALANCE_EPSILON.max(initial_balance.abs() * RELATIVE_EPSILON);

        let mut records = Vec::with_capacity(self.max_periods.min(4096) as usize);
        let mut balance = initial_balance;
        let mut cumulative_interest = 0.0;

        for period in 0..self.max_periods {
            let scheduled = cash_flow.amount_at(period);
            let step = simulator::advance(balance, self.rate_per_period, scheduled);
            cumulative_interest += step.interest;

            let (applied, closing, stop) = match self.stop {
                StopCondition::Payoff if step.new_balance <= payoff_tolerance => {
                    (-(balance + step.interest), 0.0, Some(StopReason::PaidOff))
                }
                StopCondition::Depletion if step.new_balance <= 0.0 => {
                    (-(balance + step.interest), 0.0, Some(StopReason::Depleted))
                }
                _ => (scheduled, step.new_balance, None),
            };

            // Linear interpolation between opening and unclamped closing balance
            let depletion_fraction = match stop {
                Some(StopReason::Depleted) => {
                    let drop = balance - step.new_balance;
                    Some(if drop > 0.0 { (balance / drop).clamp(0.0, 1.0) } else { 1.0 })
                }
                _ => None,
            };

            records.push(PeriodRecord {
                index: period + 1,
                opening_balance: balance,
                interest: step.interest,
                cash_flow: applied,
                closing_balance: closing,
                cumulative_interest,
            });
            balance = closing;

            if let Some(stop_reason) = stop {
                return Schedule {
                    records,
                    stop_reason,
                    depletion_fraction,
                };
            }
        }

        let stop_reason = match self.stop {
            StopCondition::Payoff => StopReason::PeriodLimit,
            StopCondition::Horizon | StopCondition::Depletion => StopReason::HorizonReached,
        };

        Schedule {
            records,
            stop_reason,
            depletion_fraction: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_horizon_runs_exact_period_count() {
        let schedule = ScheduleBuilder::new(0.05, 10).build(1000.0, CashFlow::Level(0.0));

        assert_eq!(schedule.len(), 10);
        assert_eq!(schedule.stop_reason, StopReason::HorizonReached);
        assert_relative_eq!(schedule.terminal_balance(1000.0), 1000.0 * 1.05_f64.powi(10), epsilon = 1e-9);
    }

    #[test]
    fn test_records_chain_balances() {
        let schedule = ScheduleBuilder::new(0.01, 24).build(500.0, CashFlow::Level(25.0));

        for pair in schedule.records.windows(2) {
            assert_eq!(pair[0].closing_balance, pair[1].opening_balance);
            assert_eq!(pair[0].index + 1, pair[1].index);
        }
        let interest: f64 = schedule.records.iter().map(|r| r.interest).sum();
        assert_relative_eq!(schedule.total_interest(), interest, epsilon = 1e-9);
    }

    #[test]
    fn test_payoff_caps_final_payment() {
        // 1000 at 0% paid 300 per period: 300, 300, 300, then 100
        let schedule = ScheduleBuilder::new(0.0, 10)
            .stop_when(StopCondition::Payoff)
            .build(1000.0, CashFlow::Level(-300.0));

        assert_eq!(schedule.len(), 4);
        assert_eq!(schedule.stop_reason, StopReason::PaidOff);
        let last = schedule.records.last().unwrap();
        assert_relative_eq!(last.cash_flow, -100.0);
        assert_eq!(last.closing_balance, 0.0);
    }

    #[test]
    fn test_payoff_period_limit() {
        // Payment below the interest charge never retires the balance
        let schedule = ScheduleBuilder::new(0.01, 20)
            .stop_when(StopCondition::Payoff)
            .build(1000.0, CashFlow::Level(-5.0));

        assert_eq!(schedule.len(), 20);
        assert_eq!(schedule.stop_reason, StopReason::PeriodLimit);
        assert!(schedule.terminal_balance(1000.0) > 1000.0);
    }

    #[test]
    fn test_depletion_clamps_and_interpolates() {
        // 250 at 0% withdrawing 100: crosses zero halfway through period 3
        let schedule = ScheduleBuilder::new(0.0, 10)
            .stop_when(StopCondition::Depletion)
            .build(250.0, CashFlow::Level(-100.0));

        assert_eq!(schedule.len(), 3);
        assert_eq!(schedule.stop_reason, StopReason::Depleted);
        assert_relative_eq!(schedule.depletion_fraction.unwrap(), 0.5);

        let last = schedule.records.last().unwrap();
        assert_eq!(last.closing_balance, 0.0);
        assert_relative_eq!(last.cash_flow, -50.0);
        assert!(schedule.records[1].closing_balance > 0.0);
    }

    #[test]
    fn test_depletion_not_reached_within_horizon() {
        let schedule = ScheduleBuilder::new(0.01, 12)
            .stop_when(StopCondition::Depletion)
            .build(10_000.0, CashFlow::Level(-50.0));

        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule.stop_reason, StopReason::HorizonReached);
        assert!(schedule.depletion_fraction.is_none());
    }

    #[test]
    fn test_growing_cash_flow() {
        let flow = CashFlow::Growing { base: -100.0, growth_per_period: 0.1 };
        assert_relative_eq!(flow.amount_at(0), -100.0);
        assert_relative_eq!(flow.amount_at(2), -121.0, epsilon = 1e-9);
    }

    #[test]
    fn test_period_bound_is_capped() {
        let builder = ScheduleBuilder::new(0.0, u32::MAX).stop_when(StopCondition::Payoff);
        assert_eq!(builder.max_periods(), MAX_SIMULATED_PERIODS);

        // Nothing is ever paid, so the run ends on the ceiling
        let schedule = builder.build(1000.0, CashFlow::Level(0.0));
        assert_eq!(schedule.len(), MAX_SIMULATED_PERIODS as usize);
        assert_eq!(schedule.stop_reason, StopReason::PeriodLimit);
    }

    #[test]
    fn test_zero_max_periods() {
        let schedule = ScheduleBuilder::new(0.05, 0).build(1000.0, CashFlow::Level(0.0));
        assert!(schedule.is_empty());
        assert_eq!(schedule.terminal_balance(1000.0), 1000.0);
        assert_eq!(schedule.total_interest(), 0.0);
    }
}
