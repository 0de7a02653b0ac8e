//! Two-Band HRV Power Spectrum

use crate::SynthError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::debug;

/// Spectral gain; each bin is scaled by `SPECTRAL_GAIN / N`
const SPECTRAL_GAIN: f64 = 1.7;

/// Weight of the HF (respiratory) band relative to the LF (Mayer) band
const HF_WEIGHT: f64 = 2.0;

/// Parameters of the LF/HF Gaussian bands, in normalized frequency (cycles per sample)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumParams {
    /// Number of bins, equal to the RR series length
    pub len: usize,
    /// LF band centre
    pub f1: f64,
    /// HF band centre
    pub f2: f64,
    /// LF band width
    pub c1: f64,
    /// HF band width
    pub c2: f64,
}

impl SpectrumParams {
    /// Check the band parameters before any bin is computed
    pub fn validate(&self) -> Result<(), SynthError> {
        if self.len <= 2 {
            return Err(SynthError::LengthTooShort(self.len));
        }
        check_frequency("f1", self.f1)?;
        check_frequency("f2", self.f2)?;
        check_bandwidth("c1", self.c1)?;
        check_bandwidth("c2", self.c2)?;
        Ok(())
    }
}

fn check_frequency(field: &'static str, value: f64) -> Result<(), SynthError> {
    // Written as a negated range test so NaN is rejected too
    if !(value > 0.0 && value < 0.5) {
        return Err(SynthError::FrequencyOutOfRange { field, value });
    }
    Ok(())
}

fn check_bandwidth(field: &'static str, value: f64) -> Result<(), SynthError> {
    if !(value > 0.0 && value.is_finite()) {
        return Err(SynthError::NonPositiveBandwidth { field, value });
    }
    Ok(())
}

/// Normal density `N(f; mu, sigma)`
fn gaussian(f: f64, mu: f64, sigma: f64) -> f64 {
    let variance = sigma * sigma;
    (-(f - mu).powi(2) / (2.0 * variance)).exp() / (2.0 * PI * variance).sqrt()
}

/// Symmetric magnitude spectrum of the RR process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    /// Magnitude per bin, mirrored around N/2
    magnitude: Vec<f64>,
    /// One-sided power `S1 + S2` for bins `1 .. N/2`
    one_sided_power: Vec<f64>,
}

impl Spectrum {
    /// Build the LF/HF spectrum for the given parameters
    pub fn synthesize(params: &SpectrumParams) -> Result<Self, SynthError> {
        params.validate()?;

        let n = params.len;
        let half = n / 2;
        let scale = SPECTRAL_GAIN / n as f64;

        let mut magnitude = vec![0.0; n];
        let mut one_sided_power = Vec::with_capacity(half.saturating_sub(1));

        for i in 1..half {
            let f = i as f64 / n as f64;
            let lf = scale * gaussian(f, params.f1, params.c1);
            let hf = HF_WEIGHT * scale * gaussian(f, params.f2, params.c2);
            let power = lf + hf;

            one_sided_power.push(power);
            magnitude[i] = power.sqrt();
            magnitude[n - i] = magnitude[i];
        }

        debug!(
            "Synthesized spectrum: {} bins, LF {:.3} / HF {:.3}",
            n, params.f1, params.f2
        );

        Ok(Self {
            magnitude,
            one_sided_power,
        })
    }

    /// Magnitude per bin (length N)
    pub fn magnitude(&self) -> &[f64] {
        &self.magnitude
    }

    /// One-sided band power for bins `1 .. N/2`
    pub fn one_sided_power(&self) -> &[f64] {
        &self.one_sided_power
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.magnitude.len()
    }

    /// Check if the spectrum has no bins
    pub fn is_empty(&self) -> bool {
        self.magnitude.is_empty()
    }

    /// Consume the spectrum, returning the magnitudes
    pub fn into_magnitude(self) -> Vec<f64> {
        self.magnitude
    }
}
