//! Generated Recording

use hrv_metrics::HrvMetrics;
use serde::{Deserialize, Serialize};

/// Arrays produced by one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgRecording {
    /// Sampling frequency (Hz)
    pub sampling_rate_hz: f64,
    /// Seed the phase randomizer was started from; absent for caller-supplied generators
    pub seed: Option<u64>,
    /// Magnitude spectrum (length N)
    pub spectrum: Vec<f64>,
    /// RR intervals in seconds (length N)
    pub rr_intervals: Vec<f64>,
    /// ECG samples, dimensionless (length N)
    pub ecg: Vec<f64>,
    /// Time-domain HRV summary of `rr_intervals`
    pub hrv: HrvMetrics,
    /// Instantaneous heart-rate range (min, max) in BPM
    pub heart_rate_range: Option<(f64, f64)>,
}

impl EcgRecording {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.ecg.len()
    }

    /// Check if the recording holds no samples
    pub fn is_empty(&self) -> bool {
        self.ecg.is_empty()
    }

    /// Sample times `index / sampling_rate` (seconds)
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.ecg.len())
            .map(|i| i as f64 / self.sampling_rate_hz)
            .collect()
    }

    /// Duration covered by the samples (seconds)
    pub fn duration_s(&self) -> f64 {
        self.ecg.len() as f64 / self.sampling_rate_hz
    }
}
