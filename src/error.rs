//! Error types for projection requests and scenario loading

use thiserror::Error;

/// The single error kind the projection core returns.
///
/// Every unusable input (non-positive principal or horizon, negative rate,
/// non-finite numbers, unknown frequency names) maps to `InvalidConfiguration`
/// naming the offending field, so a form layer can attach the message to it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfiguration {
        field: &'static str,
        reason: String,
    },
}

impl ProjectionError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ProjectionError::InvalidConfiguration {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the input field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            ProjectionError::InvalidConfiguration { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProjectionError>;

/// Errors raised while reading scenario files
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read scenario file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scenario CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed scenario JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("scenario `{name}`: {source}")]
    Scenario {
        name: String,
        #[source]
        source: ProjectionError,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_configuration_message() {
        let err = ProjectionError::invalid("annual_rate", "must not be negative");
        assert_eq!(err.field(), "annual_rate");
        assert_eq!(
            err.to_string(),
            "invalid configuration for `annual_rate`: must not be negative"
        );
    }

    #[test]
    fn test_load_error_wraps_scenario_name() {
        let err = LoadError::Scenario {
            name: "offer-b".to_string(),
            source: ProjectionError::invalid("mode", "unknown mode `lease`"),
        };
        assert!(err.to_string().starts_with("scenario `offer-b`"));
    }
}
