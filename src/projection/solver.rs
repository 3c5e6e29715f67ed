//! Goal-seeking helpers built on the projection engine
//!
//! Used to answer "how much can I withdraw" and "how much must I save"
//! questions from the same scenario inputs the engine consumes.

use crate::error::{ProjectionError, Result};
use crate::frequency::rate_per_period;
use crate::scenario::ScenarioInput;
use super::engine::{ProjectionConfig, ProjectionEngine, ProjectionMode};

const MAX_ITERATIONS: u32 = 200;
const TOLERANCE: f64 = 1e-6;

/// Largest per-event withdrawal that keeps a drawdown funded through its horizon.
///
/// Withdrawals grow with the scenario's inflation rate exactly as in a drawdown
/// projection; the scenario's own `periodic_cash_flow` is ignored. Solved by
/// bisection, so the answer is within `1e-6` of the depletion boundary.
pub fn sustainable_withdrawal(engine: &ProjectionEngine, scenario: &ScenarioInput) -> Result<f64> {
    let base = ScenarioInput {
        periodic_cash_flow: 0.0,
        ..scenario.clone()
    };
    base.validate(ProjectionMode::Drawdown)?;

    let engine = ProjectionEngine::new(ProjectionConfig {
        detailed_output: false,
        ..engine.config().clone()
    });

    let depletes = |magnitude: f64| -> Result<bool> {
        let trial = ScenarioInput {
            periodic_cash_flow: -magnitude,
            ..base.clone()
        };
        Ok(engine.project(&trial, ProjectionMode::Drawdown)?.depletion.is_some())
    };

    // Twice what would empty the balance in the first period
    let rate = rate_per_period(base.annual_rate, base.compounding_periods_per_year);
    let mut low = 0.0_f64;
    let mut high = 2.0 * base.principal * (1.0 + rate) * base.compounding_periods_per_year as f64
        / base.cash_flow_periods_per_year as f64;

    for _ in 0..MAX_ITERATIONS {
        if high - low < TOLERANCE {
            break;
        }
        let mid = (low + high) / 2.0;
        if depletes(mid)? {
            high = mid;
        } else {
            low = mid;
        }
    }

    Ok(low)
}

/// Per-event contribution an accumulation needs to reach `target_balance`.
///
/// Closed form of the level-contribution future value on the compounding grid;
/// returns 0 when the principal alone already reaches the target.
pub fn required_contribution(scenario: &ScenarioInput, target_balance: f64) -> Result<f64> {
    if !target_balance.is_finite() || target_balance <= 0.0 {
        return Err(ProjectionError::invalid("target_balance", "must be a positive number"));
    }

    // Placeholder contribution so a zero principal validates
    let base = ScenarioInput {
        periodic_cash_flow: 1.0,
        ..scenario.clone()
    };
    base.validate(ProjectionMode::Accumulation)?;

    let periods_per_year = base.compounding_periods_per_year;
    let rate = rate_per_period(base.annual_rate, periods_per_year);
    let periods = base.scheduled_periods(periods_per_year);

    let growth = (1.0 + rate).powi(periods as i32);
    let shortfall = target_balance - base.principal * growth;
    if shortfall <= 0.0 {
        return Ok(0.0);
    }

    let annuity_factor = if rate == 0.0 {
        periods as f64
    } else {
        (growth - 1.0) / rate
    };
    let per_period = shortfall / annuity_factor;

    Ok(per_period * periods_per_year as f64 / base.cash_flow_periods_per_year as f64)
}
