//! Synthesis Configuration
//!
//! Layered loading (defaults, file, `ECGSYN_*` environment) and up-front
//! validation of everything a generation run needs.

mod error;
mod settings;
mod validator;

pub use error::{ConfigError, ValidationError};
pub use settings::{SynthesisConfig, ENV_PREFIX};
pub use validator::{Validator, ValidationLimits, MAX_SAMPLES};
