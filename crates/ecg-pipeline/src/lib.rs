//! Synthetic ECG Generation Pipeline
//!
//! Ties the stages together in their required order:
//! configuration → spectrum → random phases → RR series → kernels → RK4 → recording.

mod error;
mod generator;
mod logging;
mod output;
mod recording;

pub use error::PipelineError;
pub use generator::{EcgGenerator, Tachogram};
pub use logging::init_logging;
pub use output::{write_recording, OutputFormat};
pub use recording::EcgRecording;
