//! Scenario runner for single and batch projections
//!
//! Every projection owns its own state, so a batch (e.g. comparing several
//! loan offers) is spread across threads with rayon.

use rayon::prelude::*;

use crate::error::Result;
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};
use super::NamedScenario;

/// Result of one scenario in a batch
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<ProjectionResult>,
}

/// Runs named scenarios against a shared engine configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new();
/// let scenarios = load_scenarios("offers.csv")?;
/// for outcome in runner.run_batch(&scenarios) {
///     println!("{}: {:?}", outcome.name, outcome.result.map(|r| r.total_interest));
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create runner with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ProjectionConfig) -> Self {
        Self {
            engine: ProjectionEngine::new(config),
        }
    }

    pub fn engine(&self) -> &ProjectionEngine {
        &self.engine
    }

    pub fn run(&self, scenario: &NamedScenario) -> Result<ProjectionResult> {
        self.engine.project(&scenario.input, scenario.mode)
    }

    /// Run every scenario in parallel; output order matches input order
    pub fn run_batch(&self, scenarios: &[NamedScenario]) -> Vec<ScenarioOutcome> {
        scenarios
            .par_iter()
            .map(|scenario| ScenarioOutcome {
                name: scenario.name.clone(),
                result: self.run(scenario),
            })
            .collect()
    }

    /// Name of the successful scenario with the least total interest
    ///
    /// Meant for comparing loan offers; failed scenarios are skipped.
    pub fn cheapest<'a>(outcomes: &'a [ScenarioOutcome]) -> Option<&'a ScenarioOutcome> {
        outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .min_by(|a, b| {
                let interest = |o: &ScenarioOutcome| o.result.as_ref().map(|r| r.total_interest).unwrap_or(f64::INFINITY);
                interest(a).total_cmp(&interest(b))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency::Frequency;
    use crate::projection::ProjectionMode;
    use crate::scenario::ScenarioInput;

    fn offer(name: &str, rate: f64, extra: f64) -> NamedScenario {
        NamedScenario {
            name: name.to_string(),
            mode: ProjectionMode::Amortization,
            input: ScenarioInput::new(300_000.0, rate, 30.0)
                .with_payment_frequency(Frequency::Monthly)
                .with_extra_payment(extra),
        }
    }

    #[test]
    fn test_batch_preserves_order_and_isolates_errors() {
        let runner = ScenarioRunner::new();
        let scenarios = vec![
            offer("a", 0.065, 0.0),
            offer("broken", -0.01, 0.0),
            offer("c", 0.059, 200.0),
        ];

        let outcomes = runner.run_batch(&scenarios);
        let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, vec!["a", "broken", "c"]);

        assert!(outcomes[0].result.is_ok());
        assert_eq!(outcomes[1].result.as_ref().unwrap_err().field(), "annual_rate");
        assert!(outcomes[2].result.is_ok());
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let runner = ScenarioRunner::new();
        let scenarios = vec![offer("a", 0.05, 0.0), offer("b", 0.06, 50.0), offer("c", 0.07, 100.0)];

        let outcomes = runner.run_batch(&scenarios);
        for (scenario, outcome) in scenarios.iter().zip(&outcomes) {
            assert_eq!(outcome.result, runner.run(scenario));
        }
    }

    #[test]
    fn test_cheapest_offer() {
        let runner = ScenarioRunner::with_config(ProjectionConfig {
            detailed_output: false,
            ..Default::default()
        });
        let outcomes = runner.run_batch(&[
            offer("high-rate", 0.07, 0.0),
            offer("low-rate", 0.055, 0.0),
            offer("invalid", f64::NAN, 0.0),
        ]);

        assert_eq!(ScenarioRunner::cheapest(&outcomes).unwrap().name, "low-rate");
        assert!(ScenarioRunner::cheapest(&[]).is_none());
    }
}
