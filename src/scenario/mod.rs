//! Scenario inputs, scenario files and batch running

mod input;
pub mod loader;
mod runner;

use serde::{Deserialize, Serialize};

use crate::projection::ProjectionMode;

pub use input::{ScenarioInput, MAX_HORIZON_YEARS};
pub use loader::{load_scenario_file, load_scenarios, load_scenarios_from_reader, load_scenarios_json};
pub use runner::{ScenarioOutcome, ScenarioRunner};

/// A scenario with a display name and the mode to run it in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedScenario {
    pub name: String,
    pub mode: ProjectionMode,
    #[serde(flatten)]
    pub input: ScenarioInput,
}
