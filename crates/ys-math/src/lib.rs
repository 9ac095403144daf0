//! Yearset math utilities.

pub mod sampling;
pub mod stats;

pub use sampling::counts::sample_counts;
pub use sampling::pool::{sample_events, EventPool};
pub use stats::{expected_annual, mean};
