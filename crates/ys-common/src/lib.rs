//! Yearset common types, dates, and errors.
//!
//! This crate provides the data model shared by the sampling and aggregation
//! crates:
//! - Event impact series with an optional sparse event-by-exposure matrix
//! - Sampling plans that make a resampling run replayable
//! - Date conversion between calendar dates and ISO strings
//! - The unified error type with stable codes

pub mod dates;
pub mod error;
pub mod matrix;
pub mod output;
pub mod plan;
pub mod series;

pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use matrix::ImpactMatrix;
pub use output::OutputFormat;
pub use plan::SamplingPlan;
pub use series::{years_of, ImpactSeries, SeriesTag};

/// Schema version for serialized series and plans.
pub const SCHEMA_VERSION: &str = "1.0.0";
