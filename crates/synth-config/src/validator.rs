//! Up-Front Configuration Validation

use crate::{ConfigError, SynthesisConfig, ValidationError};
use ecg_model::Wave;
use tracing::warn;

/// Largest accepted sample count (keeps single-request latency bounded)
pub const MAX_SAMPLES: usize = 1 << 22;

/// Validation limits
#[derive(Debug, Clone)]
pub struct ValidationLimits {
    /// Largest accepted sample count
    pub max_samples: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_samples: MAX_SAMPLES,
        }
    }
}

/// Validator for synthesis configurations
pub struct Validator {
    limits: ValidationLimits,
}

impl Validator {
    /// Create a new validator with given limits
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    /// Validate a value against the closed range [min, max]
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !(value >= range.0 && value <= range.1) {
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a value against the open interval (min, max)
    pub fn validate_open_interval(
        &self,
        field: &'static str,
        value: f64,
        interval: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !(value > interval.0 && value < interval.1) {
            Err(ValidationError::OutsideOpenInterval {
                field,
                value,
                min: interval.0,
                max: interval.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a strictly positive, finite value
    pub fn validate_positive(&self, field: &'static str, value: f64) -> Result<(), ValidationError> {
        if !(value > 0.0 && value.is_finite()) {
            Err(ValidationError::NotPositive { field, value })
        } else {
            Ok(())
        }
    }

    /// Validate a finite value that is zero or greater
    pub fn validate_non_negative(
        &self,
        field: &'static str,
        value: f64,
    ) -> Result<(), ValidationError> {
        if !(value >= 0.0 && value.is_finite()) {
            Err(ValidationError::Negative { field, value })
        } else {
            Ok(())
        }
    }

    /// Check every field, reporting all violations at once
    pub fn validate(&self, config: &SynthesisConfig) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        let mut check = |result: Result<(), ValidationError>| {
            if let Err(e) = result {
                errors.push(e);
            }
        };

        check(self.validate_positive("sampling_rate_hz", config.sampling_rate_hz));
        check(self.validate_positive("duration_s", config.duration_s));
        check(self.validate_range(
            "sample_count",
            (config.duration_s * config.sampling_rate_hz).floor(),
            (3.0, self.limits.max_samples as f64),
        ));
        check(self.validate_open_interval("f1", config.f1, (0.0, 0.5)));
        check(self.validate_open_interval("f2", config.f2, (0.0, 0.5)));
        check(self.validate_positive("c1", config.c1));
        check(self.validate_positive("c2", config.c2));
        check(self.validate_positive("hmean", config.hmean));
        if let Some(hstd) = config.hstd {
            check(self.validate_non_negative("hstd", hstd));
        }

        let kernels = config.kernel_config().to_radians();
        for wave in Wave::ALL {
            check(self.validate_positive(width_field(wave), kernels.get(wave).width));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            warn!("Rejected configuration with {} problem(s)", errors.len());
            Err(ConfigError::Rejected(errors))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationLimits::default())
    }
}

fn width_field(wave: Wave) -> &'static str {
    match wave {
        Wave::P => "kernels.p.width",
        Wave::Q => "kernels.q.width",
        Wave::R => "kernels.r.width",
        Wave::S => "kernels.s.width",
        Wave::T => "kernels.t.width",
    }
}
