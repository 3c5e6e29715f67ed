//! Growth Projection - Amortization and compound-growth engine for financial calculators
//!
//! This library provides:
//! - Frequency resolution and nominal per-period rate conversion
//! - A single-period balance simulator and a bounded schedule builder
//! - Accumulation, amortization and drawdown projections with derived statistics
//! - Retirement plans, goal-seeking solvers, and parallel batch runs over scenario files

pub mod error;
pub mod frequency;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{LoadError, ProjectionError};
pub use frequency::Frequency;
pub use projection::{project, ProjectionConfig, ProjectionEngine, ProjectionMode, ProjectionResult, YearSummary};
pub use scenario::{NamedScenario, ScenarioInput, ScenarioRunner};
