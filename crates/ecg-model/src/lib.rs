//! ECG Dynamical Model
//!
//! A three-state oscillator whose (x, y) orbit relaxes onto the unit circle
//! while the z coordinate is pushed around by five Gaussian event kernels
//! (P, Q, R, S, T). The angular speed follows an RR tachogram, so one
//! revolution of the orbit is one heartbeat.

pub mod dynamics;
pub mod integrator;
pub mod kernel;

pub use dynamics::{wrap_angle, EcgModel, OscillatorState, StateRate, INITIAL_STATE};
pub use integrator::{EcgSignal, Rk4Integrator, DIVERGENCE_PATIENCE, RADIUS_LIMIT};
pub use kernel::{HeartRateFactors, Kernel, KernelConfig, KernelParams, KernelSet, Wave};

use thiserror::Error;

/// ECG model error types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("RR series is empty")]
    EmptyRrSeries,

    #[error("Integration step {0} must be positive and finite")]
    InvalidTimeStep(f64),

    #[error("Mean heart rate {0} BPM must be positive")]
    NonPositiveHeartRate(f64),

    #[error("{wave} kernel width {width} must be positive")]
    InvalidKernelWidth { wave: Wave, width: f64 },

    #[error("Integration diverged at step {step} (t = {time:.4}s, radius {radius})")]
    NumericInstability { step: usize, time: f64, radius: f64 },
}
