//! Error types for yearset generation.
//!
//! Errors carry:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 20,
//!   "category": "sampling",
//!   "message": "cannot sample 5 distinct events for a single year when there are only 3 input events",
//!   "recoverable": true,
//!   "context": { "requested": 5, "available": 3 }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for yearset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors.
    Config,
    /// Event count and event pool sampling errors.
    Sampling,
    /// Series, matrix, and plan shape errors.
    Shape,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Sampling => write!(f, "sampling"),
            ErrorCategory::Shape => write!(f, "shape"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for yearset generation.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    // Sampling errors (20-29)
    #[error(
        "cannot sample {requested} distinct events for a single year when there are only {available} input events"
    )]
    Capacity { requested: usize, available: usize },

    #[error("invalid Poisson mean: {0}")]
    InvalidRate(f64),

    #[error("invalid event weights: {0}")]
    InvalidWeights(String),

    // Shape errors (30-39)
    #[error("the impact matrix is empty")]
    EmptyMatrix,

    #[error("the number of years ({years}) is different from the length of the sampling plan ({plan})")]
    ShapeMismatch { years: usize, plan: usize },

    #[error("length mismatch for {field}: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("sampling plan references event {index} but the series has {n_events} events")]
    IndexOutOfRange { index: usize, n_events: usize },

    #[error("invalid date: {0}")]
    InvalidDate(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Sampling errors
    /// - 30-39: Shape errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::Capacity { .. } => 20,
            Error::InvalidRate(_) => 21,
            Error::InvalidWeights(_) => 22,
            Error::EmptyMatrix => 30,
            Error::ShapeMismatch { .. } => 31,
            Error::LengthMismatch { .. } => 32,
            Error::IndexOutOfRange { .. } => 33,
            Error::InvalidDate(_) => 34,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) => ErrorCategory::Config,

            Error::Capacity { .. } | Error::InvalidRate(_) | Error::InvalidWeights(_) => {
                ErrorCategory::Sampling
            }

            Error::EmptyMatrix
            | Error::ShapeMismatch { .. }
            | Error::LengthMismatch { .. }
            | Error::IndexOutOfRange { .. }
            | Error::InvalidDate(_) => ErrorCategory::Shape,

            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error can be resolved by changing the inputs.
    ///
    /// None of these errors is transient: retrying the same call with the
    /// same inputs fails the same way.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::Capacity { .. } => true,
            Error::InvalidRate(_) => true,
            Error::InvalidWeights(_) => true,
            Error::EmptyMatrix => false,
            Error::ShapeMismatch { .. } => true,
            Error::LengthMismatch { .. } => false,
            Error::IndexOutOfRange { .. } => false,
            Error::InvalidDate(_) => false,
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check yearset.json syntax, or run 'ys-core config show' to inspect the resolved values.",
            Error::Capacity { .. } => {
                "Lower the Poisson mean with '--lambda' or use a catalogue with more events."
            }
            Error::InvalidRate(_) => "The Poisson mean must be finite and non-negative.",
            Error::InvalidWeights(_) => {
                "Event frequencies must be finite and non-negative, with enough nonzero entries for every year."
            }
            Error::EmptyMatrix => "The series needs an impact matrix with stored entries for this operation.",
            Error::ShapeMismatch { .. } => "Provide exactly one target year per sampling plan entry.",
            Error::LengthMismatch { .. } => "All per-event arrays of a series must have the same length.",
            Error::IndexOutOfRange { .. } => {
                "The sampling plan was drawn from a different catalogue. Replay it against a series of the same length."
            }
            Error::InvalidDate(_) => "Dates must be ISO formatted (YYYY-MM-DD) and exist in the target year.",
            Error::Io(_) => "Check that the input files exist and are readable.",
            Error::Json(_) => "Invalid JSON in input file. Check syntax with 'jq . <file>'.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::Capacity { .. } => "Sampling Capacity Exceeded",
            Error::InvalidRate(_) => "Invalid Poisson Mean",
            Error::InvalidWeights(_) => "Invalid Event Weights",
            Error::EmptyMatrix => "Empty Impact Matrix",
            Error::ShapeMismatch { .. } => "Years/Plan Shape Mismatch",
            Error::LengthMismatch { .. } => "Series Length Mismatch",
            Error::IndexOutOfRange { .. } => "Plan Index Out Of Range",
            Error::InvalidDate(_) => "Invalid Date",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }

    /// Format for human consumption: headline, reason, and fix.
    pub fn format_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Whether the error can be resolved by changing inputs.
    pub recoverable: bool,

    /// Additional structured context (e.g., counts, indices).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();

        match err {
            Error::Capacity {
                requested,
                available,
            } => {
                context.insert("requested".to_string(), serde_json::json!(requested));
                context.insert("available".to_string(), serde_json::json!(available));
            }
            Error::ShapeMismatch { years, plan } => {
                context.insert("years".to_string(), serde_json::json!(years));
                context.insert("plan".to_string(), serde_json::json!(plan));
            }
            Error::LengthMismatch {
                field,
                expected,
                actual,
            } => {
                context.insert("field".to_string(), serde_json::json!(field));
                context.insert("expected".to_string(), serde_json::json!(expected));
                context.insert("actual".to_string(), serde_json::json!(actual));
            }
            Error::IndexOutOfRange { index, n_events } => {
                context.insert("index".to_string(), serde_json::json!(index));
                context.insert("n_events".to_string(), serde_json::json!(n_events));
            }
            _ => {}
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}
