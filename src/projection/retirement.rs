//! Two-phase retirement projection: saving until retirement, then drawing down

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::scenario::ScenarioInput;
use super::engine::{ProjectionEngine, ProjectionMode};
use super::records::ProjectionResult;

fn default_periods_per_year() -> u32 {
    12
}

/// Inputs of a retirement calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementPlan {
    pub current_age: f64,
    pub retirement_age: f64,

    /// Age the savings must last until
    pub life_expectancy: f64,

    pub current_savings: f64,

    /// Nominal annual return before retirement
    pub annual_return: f64,

    /// Nominal annual return after retirement; defaults to `annual_return`
    #[serde(default)]
    pub annual_return_in_retirement: Option<f64>,

    #[serde(default = "default_periods_per_year")]
    pub compounding_periods_per_year: u32,

    /// Contribution per event until retirement
    #[serde(default)]
    pub contribution: f64,

    #[serde(default = "default_periods_per_year")]
    pub contribution_periods_per_year: u32,

    /// Withdrawal per event in today's money, as a positive amount
    pub withdrawal: f64,

    #[serde(default = "default_periods_per_year")]
    pub withdrawal_periods_per_year: u32,

    #[serde(default)]
    pub inflation_rate: f64,
}

/// Output of a retirement projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementProjection {
    pub accumulation: ProjectionResult,
    pub drawdown: ProjectionResult,
    pub balance_at_retirement: f64,

    /// First withdrawal after inflating today's amount to the retirement date
    pub first_withdrawal: f64,

    pub depletion_age: Option<f64>,

    /// Whether the balance lasts to life expectancy
    pub funds_outlast_plan: bool,
}

impl RetirementPlan {
    pub fn years_to_retirement(&self) -> f64 {
        self.retirement_age - self.current_age
    }

    pub fn years_in_retirement(&self) -> f64 {
        self.life_expectancy - self.retirement_age
    }

    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("current_age", self.current_age),
            ("retirement_age", self.retirement_age),
            ("life_expectancy", self.life_expectancy),
            ("withdrawal", self.withdrawal),
            ("inflation_rate", self.inflation_rate),
        ] {
            if !value.is_finite() {
                return Err(ProjectionError::invalid(field, "must be a finite number"));
            }
        }
        if self.current_age < 0.0 {
            return Err(ProjectionError::invalid("current_age", "must not be negative"));
        }
        if self.retirement_age <= self.current_age {
            return Err(ProjectionError::invalid("retirement_age", "must be later than the current age"));
        }
        if self.life_expectancy <= self.retirement_age {
            return Err(ProjectionError::invalid("life_expectancy", "must be later than the retirement age"));
        }
        if self.withdrawal < 0.0 {
            return Err(ProjectionError::invalid("withdrawal", "must not be negative"));
        }
        if self.inflation_rate <= -1.0 {
            return Err(ProjectionError::invalid("inflation_rate", "must be greater than -100%"));
        }
        Ok(())
    }

    /// Saving phase from today to the retirement date
    pub fn accumulation_scenario(&self) -> ScenarioInput {
        ScenarioInput {
            principal: self.current_savings,
            annual_rate: self.annual_return,
            compounding_periods_per_year: self.compounding_periods_per_year,
            horizon_years: self.years_to_retirement(),
            periodic_cash_flow: self.contribution,
            cash_flow_periods_per_year: self.contribution_periods_per_year,
            extra_principal_payment: 0.0,
            inflation_rate: Some(self.inflation_rate),
            start_age: Some(self.current_age),
        }
    }

    /// Withdrawal phase starting from `balance_at_retirement`
    pub fn drawdown_scenario(&self, balance_at_retirement: f64) -> ScenarioInput {
        ScenarioInput {
            principal: balance_at_retirement,
            annual_rate: self.annual_return_in_retirement.unwrap_or(self.annual_return),
            compounding_periods_per_year: self.compounding_periods_per_year,
            horizon_years: self.years_in_retirement(),
            periodic_cash_flow: -self.first_withdrawal(),
            cash_flow_periods_per_year: self.withdrawal_periods_per_year,
            extra_principal_payment: 0.0,
            inflation_rate: Some(self.inflation_rate),
            start_age: Some(self.retirement_age),
        }
    }

    /// Today's withdrawal inflated to the retirement date.
    ///
    /// Inflation compounds at `inflation_rate / compounding_periods_per_year` per
    /// period, the same growth the drawdown phase applies to its withdrawals.
    pub fn first_withdrawal(&self) -> f64 {
        let periods_per_year = self.compounding_periods_per_year.max(1) as f64;
        let growth_per_period = self.inflation_rate / periods_per_year;
        self.withdrawal * (1.0 + growth_per_period).powf(self.years_to_retirement() * periods_per_year)
    }
}

impl ProjectionEngine {
    /// Run the accumulation phase, then draw down the balance it produced
    pub fn project_retirement(&self, plan: &RetirementPlan) -> Result<RetirementProjection> {
        plan.validate()?;

        let accumulation = self.project(&plan.accumulation_scenario(), ProjectionMode::Accumulation)?;
        let balance_at_retirement = accumulation.terminal_balance;
        let drawdown = self.project(&plan.drawdown_scenario(balance_at_retirement), ProjectionMode::Drawdown)?;

        let depletion_age = drawdown.depletion.and_then(|d| d.age);
        Ok(RetirementProjection {
            balance_at_retirement,
            first_withdrawal: plan.first_withdrawal(),
            depletion_age,
            funds_outlast_plan: drawdown.depletion.is_none(),
            accumulation,
            drawdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plan() -> RetirementPlan {
        RetirementPlan {
            current_age: 35.0,
            retirement_age: 65.0,
            life_expectancy: 90.0,
            current_savings: 50_000.0,
            annual_return: 0.07,
            annual_return_in_retirement: Some(0.04),
            compounding_periods_per_year: 12,
            contribution: 500.0,
            contribution_periods_per_year: 12,
            withdrawal: 2_000.0,
            withdrawal_periods_per_year: 12,
            inflation_rate: 0.025,
        }
    }

    #[test]
    fn test_phases_chain() {
        let projection = ProjectionEngine::default().project_retirement(&plan()).unwrap();

        assert_eq!(projection.accumulation.period_count, 360);
        assert_relative_eq!(projection.drawdown.initial_balance, projection.balance_at_retirement);
        assert_relative_eq!(
            projection.first_withdrawal,
            2_000.0 * (1.0 + 0.025 / 12.0_f64).powi(360),
            max_relative = 1e-12
        );
        assert_relative_eq!(projection.drawdown.periods[0].cash_flow, -projection.first_withdrawal, epsilon = 1e-9);
    }

    #[test]
    fn test_inflation_grows_at_one_rate_across_phases() {
        let projection = ProjectionEngine::default().project_retirement(&plan()).unwrap();

        // One year of saving-phase inflation matches one year of drawdown growth
        let per_year_saving = (projection.first_withdrawal / 2_000.0).powf(1.0 / 30.0);
        let per_year_drawdown = projection.drawdown.periods[12].cash_flow / projection.drawdown.periods[0].cash_flow;
        assert_relative_eq!(per_year_saving, per_year_drawdown, max_relative = 1e-12);
    }

    #[test]
    fn test_generous_plan_outlasts_life_expectancy() {
        let generous = RetirementPlan { contribution: 3_000.0, ..plan() };
        let projection = ProjectionEngine::default().project_retirement(&generous).unwrap();

        assert!(projection.funds_outlast_plan);
        assert!(projection.depletion_age.is_none());
        assert_eq!(projection.drawdown.period_count, 300);
    }

    #[test]
    fn test_underfunded_plan_reports_depletion_age() {
        let thin = RetirementPlan {
            current_savings: 10_000.0,
            contribution: 100.0,
            withdrawal: 4_000.0,
            ..plan()
        };
        let projection = ProjectionEngine::default().project_retirement(&thin).unwrap();

        let age = projection.depletion_age.unwrap();
        assert!(!projection.funds_outlast_plan);
        assert!(age > 65.0 && age < 90.0);
    }

    #[test]
    fn test_rejects_inverted_ages() {
        let inverted = RetirementPlan { retirement_age: 30.0, ..plan() };
        let err = ProjectionEngine::default().project_retirement(&inverted).unwrap_err();
        assert_eq!(err.field(), "retirement_age");

        let short = RetirementPlan { life_expectancy: 60.0, ..plan() };
        assert!(ProjectionEngine::default().project_retirement(&short).is_err());
    }
}
