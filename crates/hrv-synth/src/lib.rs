//! HRV Tachogram Synthesis
//!
//! Builds a two-band (LF/HF) target spectrum, assigns random phases to it and
//! inverse-transforms the result into a physically valid RR-interval series.

mod error;
mod phase;
mod rr;
mod spectrum;

pub use error::SynthError;
pub use phase::{InverseTransform, PhasedSignal, QuadratureSignal, TransformKind};
pub use rr::{RrScaler, RrSeries, MIN_RR_SECONDS, RR_SENSITIVITY};
pub use spectrum::{Spectrum, SpectrumParams};
