//! HRV Time-Domain Statistics
//!
//! Summary statistics over RR-interval series (seconds in, milliseconds out).

mod normalize;
mod time_domain;

pub use normalize::normalize_min_max;
pub use time_domain::{HrvMetrics, NN50_THRESHOLD_MS};
