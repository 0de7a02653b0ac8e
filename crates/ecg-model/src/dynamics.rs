//! Oscillator Dynamics

use crate::{Kernel, KernelSet, ModelError};
use std::f64::consts::{PI, TAU};

/// Respiratory baseline wander frequency (Hz)
const RESPIRATION_HZ: f64 = 0.3;

/// Respiratory baseline wander amplitude
const RESPIRATION_AMPLITUDE: f64 = 0.005;

/// Relative tolerance when mapping a time onto its step index
const STEP_SNAP: f64 = 1e-9;

/// Start on the limit cycle, z slightly above baseline
pub const INITIAL_STATE: OscillatorState = OscillatorState {
    x: 1.0,
    y: 0.0,
    z: 0.04,
};

/// Oscillator state `(x, y, z)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl OscillatorState {
    /// Distance of (x, y) from the origin
    pub fn radius(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Phase angle of (x, y)
    pub fn phase(&self) -> f64 {
        self.y.atan2(self.x)
    }

    /// Check that every coordinate is finite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// `self + h · rate`
    pub fn advance(&self, rate: &StateRate, h: f64) -> Self {
        Self {
            x: self.x + h * rate.dx,
            y: self.y + h * rate.dy,
            z: self.z + h * rate.dz,
        }
    }
}

/// Time derivative of the state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateRate {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

/// Wrap an angle into (−π, π]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// ECG oscillator driven by a precomputed RR series
#[derive(Debug, Clone)]
pub struct EcgModel<'a> {
    kernels: [Kernel; 5],
    rr_series: &'a [f64],
    dt: f64,
}

impl<'a> EcgModel<'a> {
    /// Bind kernels, RR series (seconds) and step size (seconds)
    pub fn new(kernels: &KernelSet, rr_series: &'a [f64], dt: f64) -> Result<Self, ModelError> {
        if rr_series.is_empty() {
            return Err(ModelError::EmptyRrSeries);
        }
        if !(dt > 0.0 && dt.is_finite()) {
            return Err(ModelError::InvalidTimeStep(dt));
        }
        kernels.validate()?;

        Ok(Self {
            kernels: kernels.as_array(),
            rr_series,
            dt,
        })
    }

    /// Integration step (seconds)
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// RR interval in effect at time `t`; the index is clamped to the series
    ///
    /// Times within rounding error below a step boundary resolve to that step.
    pub fn rr_at(&self, t: f64) -> f64 {
        let last = self.rr_series.len() - 1;
        let steps = t / self.dt;
        let index = (steps + STEP_SNAP * steps.max(1.0)).floor();
        let index = if index > 0.0 { (index as usize).min(last) } else { 0 };
        self.rr_series[index]
    }

    /// Instantaneous angular frequency `2π / RR(t)`
    pub fn angular_frequency(&self, t: f64) -> f64 {
        TAU / self.rr_at(t)
    }

    /// Baseline the z coordinate relaxes toward
    pub fn baseline(t: f64) -> f64 {
        RESPIRATION_AMPLITUDE * (TAU * RESPIRATION_HZ * t).sin()
    }

    /// Summed kernel forcing at phase `theta`
    pub fn kernel_forcing(&self, theta: f64) -> f64 {
        self.kernels
            .iter()
            .map(|k| {
                let delta = wrap_angle(theta - k.position);
                k.amplitude * delta * (-delta * delta / (2.0 * k.width * k.width)).exp()
            })
            .sum()
    }

    /// Evaluate the vector field at time `t`
    pub fn derivative(&self, t: f64, state: &OscillatorState) -> StateRate {
        let alpha = 1.0 - state.radius();
        let omega = self.angular_frequency(t);

        StateRate {
            dx: alpha * state.x - omega * state.y,
            dy: alpha * state.y + omega * state.x,
            dz: -self.kernel_forcing(state.phase()) - (state.z - Self::baseline(t)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn model(rr: &[f64]) -> EcgModel<'_> {
        EcgModel::new(&KernelSet::default(), rr, 0.01).unwrap()
    }

    #[test]
    fn test_wrap_angle() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-12);
        assert!((wrap_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
        assert!((wrap_angle(5.0 * TAU + 0.25) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_rr_lookup_clamps() {
        let rr = [0.8, 0.9, 1.0];
        let model = model(&rr);
        assert_eq!(model.rr_at(-1.0), 0.8);
        assert_eq!(model.rr_at(0.0), 0.8);
        assert_eq!(model.rr_at(0.015), 0.9);
        assert_eq!(model.rr_at(0.025), 1.0);
        assert_eq!(model.rr_at(50.0), 1.0);
    }

    #[test]
    fn test_on_cycle_rotation() {
        let rr = [1.0];
        let model = model(&rr);
        let state = OscillatorState { x: 1.0, y: 0.0, z: 0.0 };
        let rate = model.derivative(0.0, &state);
        // On the unit circle there is no radial pull, only rotation at 2π/RR
        assert!(rate.dx.abs() < 1e-12);
        assert!((rate.dy - TAU).abs() < 1e-12);
    }

    #[test]
    fn test_radial_attraction() {
        let rr = [1.0];
        let model = model(&rr);
        let outside = model.derivative(0.0, &OscillatorState { x: 2.0, y: 0.0, z: 0.0 });
        let inside = model.derivative(0.0, &OscillatorState { x: 0.5, y: 0.0, z: 0.0 });
        assert!(outside.dx < 0.0);
        assert!(inside.dx > 0.0);
    }

    #[test]
    fn test_r_kernel_lifts_z_before_peak() {
        let rr = [1.0];
        let model = model(&rr);
        let before = -0.05f64;
        let after = 0.05f64;
        let rising = model.derivative(
            0.0,
            &OscillatorState { x: before.cos(), y: before.sin(), z: 0.0 },
        );
        let falling = model.derivative(
            0.0,
            &OscillatorState { x: after.cos(), y: after.sin(), z: 0.0 },
        );
        assert!(rising.dz > 0.0);
        assert!(falling.dz < 0.0);
    }

    #[test]
    fn test_z_relaxes_to_baseline_far_from_kernels() {
        let rr = [1.0];
        let model = model(&rr);
        // Opposite the R kernel every Gaussian term is negligible
        let state = OscillatorState { x: -1.0, y: 0.0, z: 0.5 };
        let rate = model.derivative(0.0, &state);
        assert!((rate.dz + 0.5).abs() < 2e-3);
    }

    #[test]
    fn test_rejects_bad_inputs() {
        let kernels = KernelSet::default();
        assert_eq!(
            EcgModel::new(&kernels, &[], 0.01).unwrap_err(),
            ModelError::EmptyRrSeries
        );
        assert_eq!(
            EcgModel::new(&kernels, &[1.0], 0.0).unwrap_err(),
            ModelError::InvalidTimeStep(0.0)
        );
    }

    #[test]
    fn test_rr_lookup_exact_at_step_boundaries() {
        // 1/360 s is not representable, so k·dt/dt can fall just below k
        let dt = 1.0 / 360.0;
        let rr: Vec<f64> = (0..100_000).map(|i| 0.5 + i as f64 * 1e-6).collect();
        let model = EcgModel::new(&KernelSet::default(), &rr, dt).unwrap();

        for k in 0..rr.len() {
            assert_eq!(model.rr_at(k as f64 * dt), rr[k], "step {}", k);
            assert_eq!(model.rr_at((k as f64 + 0.5) * dt), rr[k], "half step {}", k);
        }
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_keeps_direction(angle in -100.0f64..100.0) {
            let wrapped = wrap_angle(angle);
            prop_assert!(wrapped > -PI - 1e-12 && wrapped <= PI);
            prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-9);
            prop_assert!((wrapped.cos() - angle.cos()).abs() < 1e-9);
        }

        #[test]
        fn prop_rr_lookup_stays_in_series(t in -5.0f64..50.0) {
            let rr: Vec<f64> = (0..100).map(|i| 0.8 + 0.001 * i as f64).collect();
            let model = model(&rr);
            let value = model.rr_at(t);
            prop_assert!((0.8..=0.9).contains(&value));
        }
    }
}
