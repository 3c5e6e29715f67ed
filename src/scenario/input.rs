//! Scenario input record and its validation

use serde::{Deserialize, Serialize};

use crate::error::{ProjectionError, Result};
use crate::frequency::Frequency;
use crate::projection::ProjectionMode;

/// Longest horizon a single projection accepts
pub const MAX_HORIZON_YEARS: f64 = 200.0;

fn default_periods_per_year() -> u32 {
    12
}

/// One calculation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioInput {
    /// Opening balance (loan amount, savings, or retirement fund)
    pub principal: f64,

    /// Nominal annual interest/return rate as a fraction
    pub annual_rate: f64,

    #[serde(default = "default_periods_per_year")]
    pub compounding_periods_per_year: u32,

    /// Projection horizon or loan term; may be fractional
    pub horizon_years: f64,

    /// Signed amount per cash-flow event (positive = contribution, negative = withdrawal)
    #[serde(default)]
    pub periodic_cash_flow: f64,

    #[serde(default = "default_periods_per_year")]
    pub cash_flow_periods_per_year: u32,

    /// Extra principal paid with every loan payment
    #[serde(default)]
    pub extra_principal_payment: f64,

    #[serde(default)]
    pub inflation_rate: Option<f64>,

    /// Age at the start of the projection, used to report depletion as an age
    #[serde(default)]
    pub start_age: Option<f64>,
}

impl ScenarioInput {
    /// Create a scenario with monthly compounding and no cash flows
    pub fn new(principal: f64, annual_rate: f64, horizon_years: f64) -> Self {
        Self {
            principal,
            annual_rate,
            compounding_periods_per_year: 12,
            horizon_years,
            periodic_cash_flow: 0.0,
            cash_flow_periods_per_year: 12,
            extra_principal_payment: 0.0,
            inflation_rate: None,
            start_age: None,
        }
    }

    pub fn with_compounding(mut self, frequency: Frequency) -> Self {
        self.compounding_periods_per_year = frequency.periods_per_year();
        self
    }

    pub fn with_cash_flow(mut self, amount: f64, frequency: Frequency) -> Self {
        self.periodic_cash_flow = amount;
        self.cash_flow_periods_per_year = frequency.periods_per_year();
        self
    }

    /// Loan payment cadence; sets the cash-flow frequency without an amount
    pub fn with_payment_frequency(mut self, frequency: Frequency) -> Self {
        self.cash_flow_periods_per_year = frequency.periods_per_year();
        self
    }

    pub fn with_extra_payment(mut self, amount: f64) -> Self {
        self.extra_principal_payment = amount;
        self
    }

    pub fn with_inflation(mut self, rate: f64) -> Self {
        self.inflation_rate = Some(rate);
        self
    }

    pub fn with_start_age(mut self, age: f64) -> Self {
        self.start_age = Some(age);
        self
    }

    /// Number of whole periods covering the horizon, at least one
    pub fn scheduled_periods(&self, periods_per_year: u32) -> u32 {
        ((self.horizon_years * periods_per_year as f64).round() as u32).max(1)
    }

    /// Check the scenario is usable for `mode` before any simulation runs
    pub fn validate(&self, mode: ProjectionMode) -> Result<()> {
        finite("principal", self.principal)?;
        finite("annual_rate", self.annual_rate)?;
        finite("horizon_years", self.horizon_years)?;
        finite("periodic_cash_flow", self.periodic_cash_flow)?;
        finite("extra_principal_payment", self.extra_principal_payment)?;

        if self.principal < 0.0 {
            return Err(ProjectionError::invalid("principal", "must not be negative"));
        }
        if self.annual_rate < 0.0 {
            return Err(ProjectionError::invalid("annual_rate", "must not be negative"));
        }
        if self.horizon_years <= 0.0 {
            return Err(ProjectionError::invalid("horizon_years", "must be greater than zero"));
        }
        if self.horizon_years > MAX_HORIZON_YEARS {
            return Err(ProjectionError::invalid(
                "horizon_years",
                format!("must not exceed {} years", MAX_HORIZON_YEARS),
            ));
        }
        Frequency::from_periods_per_year(self.compounding_periods_per_year)
            .and_then(|f| f.as_compounding().ok())
            .ok_or_else(|| {
                ProjectionError::invalid(
                    "compounding_periods_per_year",
                    format!("{} is not a compounding frequency", self.compounding_periods_per_year),
                )
            })?;
        if Frequency::from_periods_per_year(self.cash_flow_periods_per_year).is_none() {
            return Err(ProjectionError::invalid(
                "cash_flow_periods_per_year",
                format!("{} is not a named cash-flow frequency", self.cash_flow_periods_per_year),
            ));
        }
        if self.extra_principal_payment < 0.0 {
            return Err(ProjectionError::invalid("extra_principal_payment", "must not be negative"));
        }
        if let Some(inflation) = self.inflation_rate {
            finite("inflation_rate", inflation)?;
            if inflation <= -1.0 {
                return Err(ProjectionError::invalid("inflation_rate", "must be greater than -100%"));
            }
        }
        if let Some(age) = self.start_age {
            finite("start_age", age)?;
            if age < 0.0 {
                return Err(ProjectionError::invalid("start_age", "must not be negative"));
            }
        }

        match mode {
            ProjectionMode::Accumulation => {
                if self.periodic_cash_flow < 0.0 {
                    return Err(ProjectionError::invalid(
                        "periodic_cash_flow",
                        "accumulation takes contributions only; use drawdown for withdrawals",
                    ));
                }
                if self.principal == 0.0 && self.periodic_cash_flow == 0.0 {
                    return Err(ProjectionError::invalid(
                        "principal",
                        "must be greater than zero when there are no contributions",
                    ));
                }
            }
            ProjectionMode::Amortization => {
                if self.principal == 0.0 {
                    return Err(ProjectionError::invalid("principal", "loan amount must be greater than zero"));
                }
            }
            ProjectionMode::Drawdown => {
                if self.principal == 0.0 {
                    return Err(ProjectionError::invalid("principal", "starting balance must be greater than zero"));
                }
                if self.periodic_cash_flow > 0.0 {
                    return Err(ProjectionError::invalid(
                        "periodic_cash_flow",
                        "drawdown takes withdrawals only (a negative amount)",
                    ));
                }
            }
        }

        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ProjectionError::invalid(field, "must be a finite number"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_frequencies() {
        let scenario = ScenarioInput::new(1000.0, 0.05, 10.0)
            .with_compounding(Frequency::Quarterly)
            .with_cash_flow(100.0, Frequency::Weekly);

        assert_eq!(scenario.compounding_periods_per_year, 4);
        assert_eq!(scenario.cash_flow_periods_per_year, 52);
        assert_eq!(scenario.periodic_cash_flow, 100.0);
    }

    #[test]
    fn test_scheduled_periods_rounds_fractional_horizon() {
        let scenario = ScenarioInput::new(1000.0, 0.05, 2.5);
        assert_eq!(scenario.scheduled_periods(12), 30);
        assert_eq!(scenario.scheduled_periods(1), 3);

        let tiny = ScenarioInput::new(1000.0, 0.05, 0.01);
        assert_eq!(tiny.scheduled_periods(1), 1);
    }

    #[test]
    fn test_rejects_non_finite_inputs() {
        let scenario = ScenarioInput::new(f64::NAN, 0.05, 10.0);
        assert_eq!(scenario.validate(ProjectionMode::Accumulation).unwrap_err().field(), "principal");

        let scenario = ScenarioInput::new(1000.0, f64::INFINITY, 10.0);
        assert_eq!(scenario.validate(ProjectionMode::Amortization).unwrap_err().field(), "annual_rate");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let base = ScenarioInput::new(1000.0, 0.05, 10.0);

        let negative_rate = ScenarioInput { annual_rate: -0.01, ..base.clone() };
        assert_eq!(negative_rate.validate(ProjectionMode::Accumulation).unwrap_err().field(), "annual_rate");

        let zero_horizon = ScenarioInput { horizon_years: 0.0, ..base.clone() };
        assert_eq!(zero_horizon.validate(ProjectionMode::Accumulation).unwrap_err().field(), "horizon_years");

        let long_horizon = ScenarioInput { horizon_years: 500.0, ..base.clone() };
        assert!(long_horizon.validate(ProjectionMode::Drawdown).is_err());

        let no_periods = ScenarioInput { compounding_periods_per_year: 0, ..base.clone() };
        assert!(no_periods.validate(ProjectionMode::Accumulation).is_err());

        let deflation = base.clone().with_inflation(-1.5);
        assert_eq!(deflation.validate(ProjectionMode::Drawdown).unwrap_err().field(), "inflation_rate");
    }

    #[test]
    fn test_periods_per_year_must_name_a_frequency() {
        let base = ScenarioInput::new(1000.0, 0.05, 1.0);

        let huge = ScenarioInput { compounding_periods_per_year: 3_000_000_000, ..base.clone() };
        assert_eq!(
            huge.validate(ProjectionMode::Accumulation).unwrap_err().field(),
            "compounding_periods_per_year"
        );

        let weekly_compounding = ScenarioInput { compounding_periods_per_year: 52, ..base.clone() };
        assert!(weekly_compounding.validate(ProjectionMode::Accumulation).is_err());

        let odd_cadence = ScenarioInput { cash_flow_periods_per_year: 3, ..base.clone() };
        assert_eq!(
            odd_cadence.validate(ProjectionMode::Amortization).unwrap_err().field(),
            "cash_flow_periods_per_year"
        );

        let daily = base.with_compounding(Frequency::Daily).with_payment_frequency(Frequency::Weekly);
        assert!(daily.validate(ProjectionMode::Amortization).is_ok());
    }

    #[test]
    fn test_mode_specific_principal_rules() {
        let empty = ScenarioInput::new(0.0, 0.05, 10.0);
        assert!(empty.validate(ProjectionMode::Amortization).is_err());
        assert!(empty.validate(ProjectionMode::Drawdown).is_err());
        assert!(empty.validate(ProjectionMode::Accumulation).is_err());

        let savings_plan = empty.with_cash_flow(200.0, Frequency::Monthly);
        assert!(savings_plan.validate(ProjectionMode::Accumulation).is_ok());
    }

    #[test]
    fn test_cash_flow_sign_follows_mode() {
        let withdrawing = ScenarioInput::new(100_000.0, 0.04, 30.0).with_cash_flow(-500.0, Frequency::Monthly);
        assert!(withdrawing.validate(ProjectionMode::Drawdown).is_ok());
        assert!(withdrawing.validate(ProjectionMode::Accumulation).is_err());

        let contributing = ScenarioInput::new(100_000.0, 0.04, 30.0).with_cash_flow(500.0, Frequency::Monthly);
        assert!(contributing.validate(ProjectionMode::Drawdown).is_err());
    }

    #[test]
    fn test_json_defaults() {
        let scenario: ScenarioInput =
            serde_json::from_str(r#"{"principal": 5000, "annual_rate": 0.04, "horizon_years": 5}"#).unwrap();
        assert_eq!(scenario, ScenarioInput::new(5000.0, 0.04, 5.0));
    }
}
