//! Synthesis Error Types

use thiserror::Error;

/// Errors raised while building an RR tachogram
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SynthError {
    /// Too few bins to hold a DC, a Nyquist and at least one band bin
    #[error("Sequence length {0} is too short, need more than 2 samples")]
    LengthTooShort(usize),

    /// Band centre outside the open interval (0, 0.5)
    #[error("{field} value {value} must lie in the open interval (0, 0.5)")]
    FrequencyOutOfRange { field: &'static str, value: f64 },

    /// Band width not strictly positive
    #[error("{field} bandwidth {value} must be positive")]
    NonPositiveBandwidth { field: &'static str, value: f64 },

    /// Mean heart rate not strictly positive
    #[error("Mean heart rate {0} BPM must be positive")]
    NonPositiveHeartRate(f64),

    /// Heart rate standard deviation negative or not finite
    #[error("Heart rate std-dev {0} BPM must be a non-negative number")]
    InvalidHeartRateStd(f64),
}
