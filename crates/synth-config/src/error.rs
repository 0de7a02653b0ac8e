//! Configuration Error Types

use thiserror::Error;

/// A single rejected configuration field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value out of the closed range [min, max]
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value outside the open interval (min, max)
    #[error("{field} value {value} must lie in ({min}, {max})")]
    OutsideOpenInterval {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Value must be strictly positive
    #[error("{field} value {value} must be positive")]
    NotPositive { field: &'static str, value: f64 },

    /// Value must be zero or greater
    #[error("{field} value {value} must not be negative")]
    Negative { field: &'static str, value: f64 },
}

/// Configuration failures
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more fields failed validation; nothing was synthesized
    #[error("Configuration rejected: {}", join_errors(.0))]
    Rejected(Vec<ValidationError>),

    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
