//! SDNN, RMSSD and pNN50

use serde::{Deserialize, Serialize};

/// Successive-difference threshold for pNN50 (milliseconds)
pub const NN50_THRESHOLD_MS: f64 = 50.0;

/// Time-domain HRV summary of an RR series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HrvMetrics {
    /// Standard deviation of the intervals (ms)
    pub sdnn_ms: f64,
    /// Root mean square of successive differences (ms)
    pub rmssd_ms: f64,
    /// Percentage of successive differences above 50 ms
    pub pnn50: f64,
    /// Mean interval (ms)
    pub mean_rr_ms: f64,
    /// Mean heart rate, `60 / mean(RR)` (BPM)
    pub mean_bpm: f64,
}

impl HrvMetrics {
    /// Compute the summary from RR intervals in seconds
    pub fn compute(rr_seconds: &[f64]) -> Self {
        if rr_seconds.is_empty() {
            return Self::default();
        }

        let rr_ms: Vec<f64> = rr_seconds.iter().map(|&rr| rr * 1000.0).collect();
        let n = rr_ms.len() as f64;

        // Mean
        let mean = rr_ms.iter().sum::<f64>() / n;

        // Population standard deviation
        let variance = rr_ms.iter().map(|&v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let sdnn_ms = variance.sqrt();

        // Successive differences
        let (rmssd_ms, pnn50) = if rr_ms.len() >= 2 {
            let diffs: Vec<f64> = rr_ms.windows(2).map(|w| w[1] - w[0]).collect();
            let count = diffs.len() as f64;
            let mean_square = diffs.iter().map(|d| d * d).sum::<f64>() / count;
            let large = diffs.iter().filter(|d| d.abs() > NN50_THRESHOLD_MS).count();
            (mean_square.sqrt(), 100.0 * large as f64 / count)
        } else {
            (0.0, 0.0)
        };

        let mean_bpm = if mean > 0.0 { 60_000.0 / mean } else { 0.0 };

        Self {
            sdnn_ms,
            rmssd_ms,
            pnn50,
            mean_rr_ms: mean,
            mean_bpm,
        }
    }
}
