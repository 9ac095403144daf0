//! Yearset configuration loading and validation.
//!
//! This crate provides:
//! - The typed `YearsetConfig` for yearset.json
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod config;
pub mod resolve;
pub mod validate;

pub use config::{load_config, YearsetConfig};
pub use resolve::{resolve_config, ConfigPath, ConfigSource};
pub use validate::{validate_config, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
