//! Yearset Core Library
//!
//! This library turns an event impact catalogue into yearly impact series:
//! - Aggregation of event impacts per sampled or calendar year
//! - Sampling bias correction
//! - Yearset building and replay from sampling plans
//! - Event-level extraction of a sampling plan
//!
//! The binary entry point is in `main.rs`.

pub mod aggregate;
pub mod correction;
pub mod exit_codes;
pub mod extract;
pub mod io;
pub mod logging;
pub mod yearset;

pub use aggregate::{aggregate_by_calendar_year, aggregate_from_plan};
pub use correction::{apply_correction, correction_factor};
pub use extract::extract;
pub use yearset::{YearsetBuilder, YearsetOptions};
