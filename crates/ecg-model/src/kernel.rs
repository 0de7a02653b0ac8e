//! PQRST Event Kernels

use crate::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// ECG wave labels, in the order the phase sweeps past them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Wave {
    P,
    Q,
    R,
    S,
    T,
}

impl Wave {
    /// All waves in sweep order
    pub const ALL: [Wave; 5] = [Wave::P, Wave::Q, Wave::R, Wave::S, Wave::T];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Wave::P => "P",
            Wave::Q => "Q",
            Wave::R => "R",
            Wave::S => "S",
            Wave::T => "T",
        }
    }
}

impl fmt::Display for Wave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kernel as configured: angular position in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelParams {
    /// Angular position (degrees)
    pub position_deg: f64,
    /// Amplitude
    pub amplitude: f64,
    /// Gaussian width (radians)
    pub width: f64,
}

impl KernelParams {
    const fn new(position_deg: f64, amplitude: f64, width: f64) -> Self {
        Self {
            position_deg,
            amplitude,
            width,
        }
    }
}

/// The five kernels in configuration units
///
/// Deserializing fills any missing wave or field from [`KernelConfig::default`],
/// so a source may override a single value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "KernelOverrides")]
pub struct KernelConfig {
    pub p: KernelParams,
    pub q: KernelParams,
    pub r: KernelParams,
    pub s: KernelParams,
    pub t: KernelParams,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            p: KernelParams::new(-60.0, 1.2, 0.25),
            q: KernelParams::new(-15.0, -5.0, 0.1),
            r: KernelParams::new(0.0, 30.0, 0.1),
            s: KernelParams::new(15.0, -7.5, 0.1),
            t: KernelParams::new(90.0, 0.75, 0.4),
        }
    }
}

/// Per-field overrides of one kernel
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ParamsOverride {
    position_deg: Option<f64>,
    amplitude: Option<f64>,
    width: Option<f64>,
}

impl ParamsOverride {
    fn apply(self, base: KernelParams) -> KernelParams {
        KernelParams {
            position_deg: self.position_deg.unwrap_or(base.position_deg),
            amplitude: self.amplitude.unwrap_or(base.amplitude),
            width: self.width.unwrap_or(base.width),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct KernelOverrides {
    p: ParamsOverride,
    q: ParamsOverride,
    r: ParamsOverride,
    s: ParamsOverride,
    t: ParamsOverride,
}

impl From<KernelOverrides> for KernelConfig {
    fn from(overrides: KernelOverrides) -> Self {
        let base = KernelConfig::default();
        Self {
            p: overrides.p.apply(base.p),
            q: overrides.q.apply(base.q),
            r: overrides.r.apply(base.r),
            s: overrides.s.apply(base.s),
            t: overrides.t.apply(base.t),
        }
    }
}

impl KernelConfig {
    /// Convert positions to radians
    pub fn to_radians(&self) -> KernelSet {
        let convert = |k: &KernelParams| Kernel {
            position: k.position_deg.to_radians(),
            amplitude: k.amplitude,
            width: k.width,
        };
        KernelSet {
            p: convert(&self.p),
            q: convert(&self.q),
            r: convert(&self.r),
            s: convert(&self.s),
            t: convert(&self.t),
        }
    }

    /// Reject kernels whose width would divide by zero
    pub fn validate(&self) -> Result<(), ModelError> {
        self.to_radians().validate()
    }
}

/// One Gaussian event kernel in model units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kernel {
    /// Angular position (radians)
    pub position: f64,
    /// Amplitude
    pub amplitude: f64,
    /// Gaussian width (radians)
    pub width: f64,
}

/// Heart-rate dependent scale factors
///
/// `factor2 = sqrt(hmean / 60)` stretches widths and the P/T positions,
/// `factor1 = factor2²` moves Q and S.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartRateFactors {
    pub factor1: f64,
    pub factor2: f64,
}

impl HeartRateFactors {
    /// Derive both factors from the mean heart rate (BPM)
    pub fn from_heart_rate(hmean: f64) -> Result<Self, ModelError> {
        if !(hmean > 0.0 && hmean.is_finite()) {
            return Err(ModelError::NonPositiveHeartRate(hmean));
        }
        let base = (hmean / 60.0).sqrt();
        Ok(Self {
            factor1: base * base,
            factor2: base,
        })
    }
}

/// The five kernels in model units, read-only during integration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KernelSet {
    pub p: Kernel,
    pub q: Kernel,
    pub r: Kernel,
    pub s: Kernel,
    pub t: Kernel,
}

impl Default for KernelSet {
    fn default() -> Self {
        KernelConfig::default().to_radians()
    }
}

impl KernelSet {
    /// Kernels in sweep order
    pub fn as_array(&self) -> [Kernel; 5] {
        [self.p, self.q, self.r, self.s, self.t]
    }

    /// Kernel for a given wave
    pub fn get(&self, wave: Wave) -> &Kernel {
        match wave {
            Wave::P => &self.p,
            Wave::Q => &self.q,
            Wave::R => &self.r,
            Wave::S => &self.s,
            Wave::T => &self.t,
        }
    }

    /// Multiply every width by `factor`
    pub fn scale_widths(mut self, factor: f64) -> Self {
        self.p.width *= factor;
        self.q.width *= factor;
        self.r.width *= factor;
        self.s.width *= factor;
        self.t.width *= factor;
        self
    }

    /// Multiply the P/T positions by `outer` and the Q/S positions by `inner`
    ///
    /// R stays at its configured position.
    pub fn scale_positions(mut self, outer: f64, inner: f64) -> Self {
        self.p.position *= outer;
        self.q.position *= inner;
        self.s.position *= inner;
        self.t.position *= outer;
        self
    }

    /// Adapt the kernel set to a mean heart rate
    pub fn adapt_to_heart_rate(self, hmean: f64) -> Result<Self, ModelError> {
        let factors = HeartRateFactors::from_heart_rate(hmean)?;
        Ok(self
            .scale_widths(factors.factor2)
            .scale_positions(factors.factor2, factors.factor1))
    }

    /// Reject non-positive or non-finite widths
    pub fn validate(&self) -> Result<(), ModelError> {
        for wave in Wave::ALL {
            let width = self.get(wave).width;
            if !(width > 0.0 && width.is_finite()) {
                return Err(ModelError::InvalidKernelWidth { wave, width });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_default_positions_in_radians() {
        let set = KernelSet::default();
        assert!((set.p.position + PI / 3.0).abs() < 1e-12);
        assert!((set.q.position + PI / 12.0).abs() < 1e-12);
        assert_eq!(set.r.position, 0.0);
        assert!((set.s.position - PI / 12.0).abs() < 1e-12);
        assert!((set.t.position - PI / 2.0).abs() < 1e-12);
        assert_eq!(set.r.amplitude, 30.0);
    }

    #[test]
    fn test_resting_rate_leaves_kernels_unchanged() {
        let set = KernelSet::default();
        assert_eq!(set.adapt_to_heart_rate(60.0).unwrap(), set);
    }

    #[test]
    fn test_fast_rate_scaling() {
        let base = KernelSet::default();
        let adapted = base.adapt_to_heart_rate(120.0).unwrap();
        let root2 = 2f64.sqrt();

        assert!((adapted.p.width - base.p.width * root2).abs() < 1e-12);
        assert!((adapted.t.width - base.t.width * root2).abs() < 1e-12);
        assert!((adapted.p.position - base.p.position * root2).abs() < 1e-12);
        assert!((adapted.t.position - base.t.position * root2).abs() < 1e-12);
        assert!((adapted.q.position - base.q.position * 2.0).abs() < 1e-12);
        assert!((adapted.s.position - base.s.position * 2.0).abs() < 1e-12);
        assert_eq!(adapted.r.position, 0.0);
        // Amplitudes are not touched
        assert_eq!(adapted.r.amplitude, base.r.amplitude);
    }

    #[test]
    fn test_factors() {
        let f = HeartRateFactors::from_heart_rate(240.0).unwrap();
        assert!((f.factor2 - 2.0).abs() < 1e-12);
        assert!((f.factor1 - 4.0).abs() < 1e-12);
        assert_eq!(
            HeartRateFactors::from_heart_rate(0.0),
            Err(ModelError::NonPositiveHeartRate(0.0))
        );
    }

    #[test]
    fn test_zero_width_rejected() {
        let mut config = KernelConfig::default();
        config.s.width = 0.0;
        assert_eq!(
            config.validate(),
            Err(ModelError::InvalidKernelWidth {
                wave: Wave::S,
                width: 0.0
            })
        );
        assert!(KernelConfig::default().validate().is_ok());
    }

    #[test]
    fn test_sweep_order() {
        let set = KernelSet::default();
        let positions: Vec<f64> = set.as_array().iter().map(|k| k.position).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config: KernelConfig =
            serde_json::from_str(r#"{ "r": { "amplitude": 25.0 } }"#).unwrap();
        let base = KernelConfig::default();

        assert_eq!(config.r.amplitude, 25.0);
        assert_eq!(config.r.width, base.r.width);
        assert_eq!(config.r.position_deg, base.r.position_deg);
        assert_eq!(config.p, base.p);
        assert_eq!(config.t, base.t);

        let empty: KernelConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, base);
    }
}
