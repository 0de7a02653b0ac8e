//! Fixed-Step RK4 Driver

use crate::dynamics::{EcgModel, OscillatorState, INITIAL_STATE};
use crate::ModelError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Radius above which a step counts toward divergence
pub const RADIUS_LIMIT: f64 = 4.0;

/// Consecutive out-of-band steps tolerated before failing
pub const DIVERGENCE_PATIENCE: usize = 8;

/// Synthesized ECG samples (the recorded z coordinate, dimensionless)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EcgSignal {
    pub samples: Vec<f64>,
}

impl EcgSignal {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if there are no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Classical 4th-order Runge-Kutta integrator with a fixed step
#[derive(Debug, Clone, Copy)]
pub struct Rk4Integrator {
    steps: usize,
}

impl Rk4Integrator {
    /// Create an integrator that runs for `steps` steps
    pub fn new(steps: usize) -> Self {
        Self { steps }
    }

    /// Number of steps (and output samples)
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Advance `state` by one step of size `dt` starting at time `t`
    pub fn step(model: &EcgModel<'_>, t: f64, state: &OscillatorState) -> OscillatorState {
        let dt = model.dt();
        let half = dt / 2.0;

        let k1 = model.derivative(t, state);
        let k2 = model.derivative(t + half, &state.advance(&k1, half));
        let k3 = model.derivative(t + half, &state.advance(&k2, half));
        let k4 = model.derivative(t + dt, &state.advance(&k3, dt));

        OscillatorState {
            x: state.x + dt * (k1.dx + 2.0 * k2.dx + 2.0 * k3.dx + k4.dx) / 6.0,
            y: state.y + dt * (k1.dy + 2.0 * k2.dy + 2.0 * k3.dy + k4.dy) / 6.0,
            z: state.z + dt * (k1.dz + 2.0 * k2.dz + 2.0 * k3.dz + k4.dz) / 6.0,
        }
    }

    /// Integrate from [`INITIAL_STATE`] and record z before every step
    pub fn integrate(&self, model: &EcgModel<'_>) -> Result<EcgSignal, ModelError> {
        self.integrate_observed(model, |_, _| {})
    }

    /// Like [`integrate`](Self::integrate), calling `observe(step, state)` with the pre-update state
    pub fn integrate_observed<F>(
        &self,
        model: &EcgModel<'_>,
        mut observe: F,
    ) -> Result<EcgSignal, ModelError>
    where
        F: FnMut(usize, &OscillatorState),
    {
        let dt = model.dt();
        let mut state = INITIAL_STATE;
        let mut out_of_band = 0usize;
        let mut samples = Vec::with_capacity(self.steps);

        for step in 0..self.steps {
            observe(step, &state);
            samples.push(state.z);

            // Derived from the step index so RR lookups never drift
            state = Self::step(model, step as f64 * dt, &state);
            let t = (step + 1) as f64 * dt;

            let radius = state.radius();
            if !state.is_finite() {
                warn!("Non-finite oscillator state at step {}", step);
                return Err(ModelError::NumericInstability {
                    step,
                    time: t,
                    radius,
                });
            }

            if radius > RADIUS_LIMIT {
                out_of_band += 1;
                if out_of_band >= DIVERGENCE_PATIENCE {
                    warn!(
                        "Oscillator radius {:.3} above {} for {} steps",
                        radius, RADIUS_LIMIT, out_of_band
                    );
                    return Err(ModelError::NumericInstability {
                        step,
                        time: t,
                        radius,
                    });
                }
            } else {
                out_of_band = 0;
            }
        }

        debug!("Integrated {} RK4 steps (dt = {:.5}s)", self.steps, dt);

        Ok(EcgSignal { samples })
    }
}
