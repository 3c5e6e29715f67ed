//! Load named scenarios from CSV or JSON
//!
//! CSV columns: `name, mode, principal, annual_rate, compounding, horizon_years,
//! cash_flow, cash_flow_frequency, extra_payment, inflation_rate, start_age`.
//! Frequencies are given by name; blank optional columns fall back to defaults.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use crate::error::{LoadError, ProjectionError};
use crate::frequency::Frequency;
use crate::projection::ProjectionMode;
use super::{NamedScenario, ScenarioInput};

/// Raw CSV row
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    mode: String,
    principal: f64,
    annual_rate: f64,
    #[serde(default)]
    compounding: Option<String>,
    horizon_years: f64,
    #[serde(default)]
    cash_flow: Option<f64>,
    #[serde(default)]
    cash_flow_frequency: Option<String>,
    #[serde(default)]
    extra_payment: Option<f64>,
    #[serde(default)]
    inflation_rate: Option<f64>,
    #[serde(default)]
    start_age: Option<f64>,
}

impl CsvRow {
    fn to_scenario(self) -> Result<NamedScenario, LoadError> {
        let name = self.name;
        let wrap = |source: ProjectionError| LoadError::Scenario {
            name: name.clone(),
            source,
        };

        let mode: ProjectionMode = self.mode.parse().map_err(wrap)?;

        let compounding = match self.compounding.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => Frequency::compounding(s).map_err(wrap)?,
            None => Frequency::Monthly,
        };

        let cash_flow_frequency = match self.cash_flow_frequency.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) if mode == ProjectionMode::Amortization => Frequency::payment(s).map_err(wrap)?,
            Some(s) => s.parse::<Frequency>().map_err(wrap)?,
            None => Frequency::Monthly,
        };

        let input = ScenarioInput {
            principal: self.principal,
            annual_rate: self.annual_rate,
            compounding_periods_per_year: compounding.periods_per_year(),
            horizon_years: self.horizon_years,
            periodic_cash_flow: self.cash_flow.unwrap_or(0.0),
            cash_flow_periods_per_year: cash_flow_frequency.periods_per_year(),
            extra_principal_payment: self.extra_payment.unwrap_or(0.0),
            inflation_rate: self.inflation_rate,
            start_age: self.start_age,
        };

        Ok(NamedScenario { name, mode, input })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<NamedScenario>, LoadError> {
    let file = File::open(path)?;
    load_scenarios_from_reader(file)
}

/// Load CSV scenarios from any reader (e.g., string buffer, network stream)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<NamedScenario>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut scenarios = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.to_scenario()?);
    }

    Ok(scenarios)
}

/// Load a JSON array of scenarios
pub fn load_scenarios_json<R: Read>(reader: R) -> Result<Vec<NamedScenario>, LoadError> {
    Ok(serde_json::from_reader(reader)?)
}

/// Load scenarios from a file, choosing the format by extension
pub fn load_scenario_file<P: AsRef<Path>>(path: P) -> Result<Vec<NamedScenario>, LoadError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        load_scenarios_json(File::open(path)?)
    } else {
        load_scenarios(path)
    }
}
