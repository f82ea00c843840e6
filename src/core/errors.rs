/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use crate::core::types::Name;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors, raised once at construction time
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum ConfigError {
    #[error("Sample rate {0} is outside [0.0, 1.0]")]
    #[diagnostic(
        code(config::invalid_sample_rate),
        help("Use 1.0 to capture every operation, or a fraction such as 0.1 to keep 10%.")
    )]
    InvalidSampleRate(f64),

    #[error("Threshold '{name}' must be a positive finite number, got {value}")]
    #[diagnostic(
        code(config::invalid_threshold),
        help("Thresholds override severity cutoffs and must be greater than zero.")
    )]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Provisioned baseline '{name}' must be a positive finite number, got {value}")]
    #[diagnostic(
        code(config::invalid_baseline),
        help("Provisioned capacity is expressed in units per second. Omit the baseline for on-demand tables.")
    )]
    InvalidBaseline { name: &'static str, value: f64 },

    #[error("Unit price '{name}' must be a non-negative finite number, got {value}")]
    #[diagnostic(code(config::invalid_pricing))]
    InvalidPricing { name: &'static str, value: f64 },

    #[error("Failed to parse configuration: {0}")]
    #[diagnostic(
        code(config::parse_failed),
        help("Configuration is JSON with camelCase keys, e.g. {{\"sampleRate\": 0.5}}.")
    )]
    Parse(String),

    #[error("Environment variable {var} has invalid value '{value}'")]
    #[diagnostic(code(config::invalid_env))]
    Env { var: &'static str, value: String },
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

/// Failure inside a single detector; isolated by the engine
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum DetectorError {
    #[error("Detector '{0}' evaluated an empty group")]
    #[diagnostic(code(detector::empty_group))]
    EmptyGroup(Name),

    #[error("Detector '{detector}' produced a non-finite {metric}")]
    #[diagnostic(
        code(detector::non_finite_metric),
        help("Usually caused by a division by zero over malformed records.")
    )]
    NonFiniteMetric { detector: Name, metric: Name },

    #[error("Detector '{detector}' panicked: {message}")]
    #[diagnostic(
        code(detector::panicked),
        help("This is a bug in the detector. Other detectors still ran.")
    )]
    Panicked { detector: Name, message: String },
}

/// Unified advisor error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum AdvisorError {
    #[error("Configuration error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Detector error: {0}")]
    #[diagnostic(transparent)]
    Detector(#[from] DetectorError),
}

pub type AdvisorResult<T> = Result<T, AdvisorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidSampleRate(1.5);
        assert_eq!(err.to_string(), "Sample rate 1.5 is outside [0.0, 1.0]");

        let err = ConfigError::InvalidThreshold {
            name: "slowQueryMs",
            value: -1.0,
        };
        assert!(err.to_string().contains("slowQueryMs"));
    }

    #[test]
    fn test_detector_error_serialization() {
        let err = DetectorError::NonFiniteMetric {
            detector: "scan-efficiency".into(),
            metric: "efficiency".into(),
        };

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("non_finite_metric"));

        let back: DetectorError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }

    #[test]
    fn test_advisor_error_from() {
        let err: AdvisorError = ConfigError::InvalidSampleRate(-0.1).into();
        assert!(matches!(err, AdvisorError::Config(_)));
    }
}
