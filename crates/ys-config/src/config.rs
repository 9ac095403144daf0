//! Typed yearset configuration (yearset.json).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::validate::{validate_config, ValidationError, ValidationResult};

/// Settings for a yearset build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct YearsetConfig {
    /// Schema version of this file.
    pub schema_version: String,

    /// Poisson mean of events per year. `None` uses the sum of the
    /// catalogue's event frequencies.
    pub lambda: Option<f64>,

    /// Divide the yearly impacts by the ratio of the catalogue's expected
    /// annual impact to their mean.
    pub apply_correction: bool,

    /// Seed for the random generator. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for YearsetConfig {
    fn default() -> Self {
        YearsetConfig {
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            lambda: None,
            apply_correction: true,
            seed: None,
        }
    }
}

impl YearsetConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        let config: YearsetConfig =
            serde_json::from_str(json).map_err(|e| ValidationError::ParseError(e.to_string()))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Apply command-line overrides on top of file values.
    pub fn with_overrides(
        mut self,
        lambda: Option<f64>,
        no_correction: bool,
        seed: Option<u64>,
    ) -> ValidationResult<Self> {
        if lambda.is_some() {
            self.lambda = lambda;
        }
        if no_correction {
            self.apply_correction = false;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        validate_config(&self)?;
        Ok(self)
    }
}

/// Load a config file, or the built-in defaults when `path` is `None`.
pub fn load_config(path: Option<&Path>) -> ValidationResult<YearsetConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| ValidationError::IoError(format!("{}: {}", path.display(), e)))?;
            YearsetConfig::from_json(&content)
        }
        None => Ok(YearsetConfig::default()),
    }
}
