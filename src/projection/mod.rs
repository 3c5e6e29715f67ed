//! Projection engine for loan, savings and retirement scenarios

mod simulator;
mod schedule;
mod records;
mod engine;
mod stats;
mod solver;
mod retirement;

pub use simulator::{advance, PeriodStep};
pub use schedule::{
    CashFlow, Schedule, ScheduleBuilder, StopCondition, StopReason, BALANCE_EPSILON, MAX_SIMULATED_PERIODS,
};
pub use records::{
    summarize_years, Depletion, LoanSummary, PeriodRecord, ProjectionResult, ProjectionSummary, YearSummary,
};
pub use engine::{project, ProjectionConfig, ProjectionEngine, ProjectionMode};
pub use stats::{
    annual_decay_rate, doubling_time_exact, doubling_time_rule_of_72, effective_annual_rate,
    inflation_adjusted_value, level_payment,
};
pub use solver::{required_contribution, sustainable_withdrawal};
pub use retirement::{RetirementPlan, RetirementProjection};
