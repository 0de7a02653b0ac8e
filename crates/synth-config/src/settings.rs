//! Synthesis Settings

use crate::{ConfigError, Validator};
use ecg_model::KernelConfig;
use hrv_synth::{SpectrumParams, TransformKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Environment variable prefix (`ECGSYN_HMEAN=72`, `ECGSYN_KERNELS__R__AMPLITUDE=25`)
pub const ENV_PREFIX: &str = "ECGSYN";

/// Parameters of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Recording length (seconds)
    pub duration_s: f64,

    /// Sampling frequency (Hz)
    pub sampling_rate_hz: f64,

    /// LF band centre (normalized frequency)
    pub f1: f64,

    /// HF band centre (normalized frequency)
    pub f2: f64,

    /// LF band width
    pub c1: f64,

    /// HF band width
    pub c2: f64,

    /// Mean heart rate (BPM)
    pub hmean: f64,

    /// Heart rate standard deviation (BPM); fixed RR sensitivity when absent
    pub hstd: Option<f64>,

    /// Seed for the phase randomizer; drawn from the OS when absent
    pub seed: Option<u64>,

    /// Inverse transform implementation
    pub transform: TransformKind,

    /// PQRST kernel override (positions in degrees)
    pub kernels: Option<KernelConfig>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            duration_s: 10.0,
            sampling_rate_hz: 256.0,
            f1: 0.1,
            f2: 0.25,
            c1: 0.01,
            c2: 0.01,
            hmean: 60.0,
            hstd: None,
            seed: None,
            transform: TransformKind::Fft,
            kernels: None,
        }
    }
}

impl SynthesisConfig {
    /// Resting adult, 60 BPM
    pub fn resting() -> Self {
        Self::default()
    }

    /// Light exercise, 120 BPM with 1 BPM spread
    pub fn exercise() -> Self {
        Self {
            hmean: 120.0,
            hstd: Some(1.0),
            ..Default::default()
        }
    }

    /// Load defaults, then an optional file, then `ECGSYN_*` environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            debug!("Loading configuration file {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Number of samples, `floor(duration × sampling rate)`
    pub fn sample_count(&self) -> usize {
        let n = (self.duration_s * self.sampling_rate_hz).floor();
        if n.is_finite() && n > 0.0 {
            n as usize
        } else {
            0
        }
    }

    /// Integration step (seconds)
    pub fn time_step(&self) -> f64 {
        1.0 / self.sampling_rate_hz
    }

    /// Band parameters for the spectrum stage
    pub fn spectrum_params(&self) -> SpectrumParams {
        SpectrumParams {
            len: self.sample_count(),
            f1: self.f1,
            f2: self.f2,
            c1: self.c1,
            c2: self.c2,
        }
    }

    /// Effective kernel configuration
    pub fn kernel_config(&self) -> KernelConfig {
        self.kernels.unwrap_or_default()
    }

    /// Validate with the default limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        Validator::default().validate(self)
    }
}
