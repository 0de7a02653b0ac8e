//! RR-Interval Scaling

use crate::SynthError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shortest admissible RR interval (seconds), i.e. at most 150 BPM
pub const MIN_RR_SECONDS: f64 = 0.4;

/// Seconds of RR variation per unit of synthesized signal
pub const RR_SENSITIVITY: f64 = 0.1;

/// Immutable RR-interval series in seconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrSeries {
    intervals: Vec<f64>,
}

impl RrSeries {
    /// Intervals in seconds
    pub fn as_slice(&self) -> &[f64] {
        &self.intervals
    }

    /// Number of intervals
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Check if the series is empty
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Mean interval (seconds), 0 for an empty series
    pub fn mean(&self) -> f64 {
        mean(&self.intervals)
    }

    /// Instantaneous heart-rate range `(min, max)` in BPM
    pub fn heart_rate_range(&self) -> Option<(f64, f64)> {
        let longest = self.intervals.iter().cloned().fold(f64::NAN, f64::max);
        let shortest = self.intervals.iter().cloned().fold(f64::NAN, f64::min);
        if longest.is_nan() {
            return None;
        }
        Some((60.0 / longest, 60.0 / shortest))
    }

    /// Consume the series, returning the intervals
    pub fn into_vec(self) -> Vec<f64> {
        self.intervals
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Maps a synthesized signal onto physical RR intervals around `60 / hmean`
///
/// Without `hstd` the centered signal is scaled by the fixed [`RR_SENSITIVITY`],
/// which is the classic ECGSYN tachogram. With `hstd` the signal is instead
/// normalized to unit spread and rescaled to `60·hstd / hmean²` seconds, so the
/// requested variability holds whatever the spectral power.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrScaler {
    /// Mean heart rate (BPM)
    hmean: f64,
    /// Optional heart rate standard deviation (BPM)
    hstd: Option<f64>,
}

impl RrScaler {
    /// Create a scaler for the target heart rate
    pub fn new(hmean: f64, hstd: Option<f64>) -> Result<Self, SynthError> {
        if !(hmean > 0.0 && hmean.is_finite()) {
            return Err(SynthError::NonPositiveHeartRate(hmean));
        }
        if let Some(std) = hstd {
            if !(std >= 0.0 && std.is_finite()) {
                return Err(SynthError::InvalidHeartRateStd(std));
            }
        }
        Ok(Self { hmean, hstd })
    }

    /// Baseline interval (seconds)
    pub fn baseline(&self) -> f64 {
        60.0 / self.hmean
    }

    /// Target RR standard deviation (seconds) when `hstd` is set
    ///
    /// First-order propagation of a heart-rate deviation through `60 / h`.
    pub fn target_rr_std(&self) -> Option<f64> {
        self.hstd.map(|std| 60.0 * std / (self.hmean * self.hmean))
    }

    /// Center `signal`, scale it into seconds, add the baseline and clamp at [`MIN_RR_SECONDS`]
    pub fn scale(&self, signal: &[f64]) -> RrSeries {
        let center = mean(signal);
        let gain = self.gain(signal, center);
        let baseline = self.baseline();

        let mut clamped = 0usize;
        let intervals = signal
            .iter()
            .map(|&s| {
                let rr = (s - center) * gain + baseline;
                if rr < MIN_RR_SECONDS {
                    clamped += 1;
                    MIN_RR_SECONDS
                } else {
                    rr
                }
            })
            .collect();

        debug!(
            "Scaled {} RR intervals around {:.3}s (gain {:.4}, {} clamped)",
            signal.len(),
            baseline,
            gain,
            clamped
        );

        RrSeries { intervals }
    }

    fn gain(&self, signal: &[f64], center: f64) -> f64 {
        let Some(target) = self.target_rr_std() else {
            return RR_SENSITIVITY;
        };

        let spread = if signal.is_empty() {
            0.0
        } else {
            let variance = signal.iter().map(|&s| (s - center).powi(2)).sum::<f64>()
                / signal.len() as f64;
            variance.sqrt()
        };

        if spread > 0.0 {
            target / spread
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn std_dev(values: &[f64]) -> f64 {
        let m = mean(values);
        (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
    }

    #[test]
    fn test_centered_around_baseline() {
        let scaler = RrScaler::new(60.0, None).unwrap();
        let rr = scaler.scale(&[0.5, -0.5, 1.0, -1.0]);
        for (got, want) in rr.as_slice().iter().zip([1.05, 0.95, 1.1, 0.9]) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!((rr.mean() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_offset_signal_is_recentered() {
        let scaler = RrScaler::new(75.0, None).unwrap();
        let rr = scaler.scale(&[10.0, 10.2, 9.8]);
        assert!((rr.mean() - 0.8).abs() < 1e-12);
        assert!((rr.as_slice()[1] - 0.82).abs() < 1e-12);
    }

    #[test]
    fn test_without_hstd_gain_ignores_signal_power() {
        let scaler = RrScaler::new(60.0, None).unwrap();
        assert_eq!(scaler.target_rr_std(), None);

        let quiet = scaler.scale(&[0.01, -0.01]);
        let loud = scaler.scale(&[1.0, -1.0]);
        assert!((quiet.as_slice()[0] - (1.0 + RR_SENSITIVITY * 0.01)).abs() < 1e-12);
        assert!((loud.as_slice()[0] - (1.0 + RR_SENSITIVITY)).abs() < 1e-12);
    }

    #[test]
    fn test_floor_clamp() {
        let scaler = RrScaler::new(140.0, None).unwrap();
        let rr = scaler.scale(&[-3.0, 0.0, 3.0]);
        assert_eq!(rr.as_slice()[0], MIN_RR_SECONDS);
        assert!(rr.as_slice().iter().all(|&v| v >= MIN_RR_SECONDS));
    }

    #[test]
    fn test_hstd_sets_spread() {
        let scaler = RrScaler::new(60.0, Some(3.0)).unwrap();
        let signal: Vec<f64> = (0..200).map(|i| (i as f64 * 0.3).sin()).collect();
        let rr = scaler.scale(&signal);
        // 60 * 3 / 60² = 50 ms
        assert!((std_dev(rr.as_slice()) - 0.05).abs() < 1e-9);
        assert!((rr.mean() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_hstd_gives_constant_series() {
        let scaler = RrScaler::new(80.0, Some(0.0)).unwrap();
        let rr = scaler.scale(&[0.3, -0.2, 0.9]);
        assert!(rr.as_slice().iter().all(|&v| v == 0.75));
    }

    #[test]
    fn test_heart_rate_range() {
        let scaler = RrScaler::new(60.0, None).unwrap();
        let rr = scaler.scale(&[2.0, -2.0]);
        let (low, high) = rr.heart_rate_range().unwrap();
        assert!((low - 60.0 / 1.2).abs() < 1e-9);
        assert!((high - 60.0 / 0.8).abs() < 1e-9);
        assert!(scaler.scale(&[]).heart_rate_range().is_none());
    }

    #[test]
    fn test_rejects_invalid_heart_rate() {
        assert_eq!(
            RrScaler::new(0.0, None),
            Err(SynthError::NonPositiveHeartRate(0.0))
        );
        assert!(RrScaler::new(-10.0, None).is_err());
        assert!(RrScaler::new(60.0, Some(-1.0)).is_err());
    }

    proptest! {
        #[test]
        fn prop_floor_and_length(
            signal in proptest::collection::vec(-50.0f64..50.0, 1..300),
            hmean in 20.0f64..200.0,
        ) {
            let rr = RrScaler::new(hmean, None).unwrap().scale(&signal);
            prop_assert_eq!(rr.len(), signal.len());
            prop_assert!(rr.as_slice().iter().all(|&v| v >= MIN_RR_SECONDS));
        }

        #[test]
        fn prop_mean_tracks_heart_rate(
            signal in proptest::collection::vec(-1.0f64..1.0, 2..300),
            hmean in 30.0f64..90.0,
        ) {
            // Variation stays within ±0.2s, so nothing reaches the floor
            let rr = RrScaler::new(hmean, None).unwrap().scale(&signal);
            prop_assert!((rr.mean() - 60.0 / hmean).abs() < 1e-9);
        }
    }
}
