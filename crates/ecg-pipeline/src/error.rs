//! Pipeline Error Types

use ecg_model::ModelError;
use hrv_synth::SynthError;
use synth_config::ConfigError;
use thiserror::Error;

/// Errors that end a generation request
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("RR synthesis failed: {0}")]
    Synth(#[from] SynthError),

    #[error("ECG model failed: {0}")]
    Model(#[from] ModelError),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl PipelineError {
    /// Short label used for failure metrics
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "config_rejected",
            PipelineError::Synth(_) => "synthesis",
            PipelineError::Model(ModelError::NumericInstability { .. }) => "numeric_instability",
            PipelineError::Model(_) => "model",
            PipelineError::Io(_) => "io",
            PipelineError::Serialization(_) => "serialization",
        }
    }

    /// Check if the integrator diverged
    pub fn is_numeric_instability(&self) -> bool {
        matches!(
            self,
            PipelineError::Model(ModelError::NumericInstability { .. })
        )
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

impl From<postcard::Error> for PipelineError {
    fn from(err: postcard::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
