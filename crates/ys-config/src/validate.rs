//! Configuration validation errors and semantic validation.

use thiserror::Error;

use crate::config::YearsetConfig;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::InvalidValue { .. } => 11,
            ValidationError::VersionMismatch { .. } => 12,
        }
    }
}

/// Validate a yearset configuration semantically.
pub fn validate_config(config: &YearsetConfig) -> ValidationResult<()> {
    if config.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: config.schema_version.clone(),
        });
    }

    if let Some(lambda) = config.lambda {
        if !lambda.is_finite() || lambda < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "lambda".to_string(),
                message: format!("Must be finite and >= 0, got {}", lambda),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&YearsetConfig::default()).is_ok());
    }

    #[test]
    fn negative_lambda_rejected() {
        let config = YearsetConfig {
            lambda: Some(-1.0),
            ..YearsetConfig::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "lambda"));
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn nan_lambda_rejected() {
        let config = YearsetConfig {
            lambda: Some(f64::NAN),
            ..YearsetConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn schema_version_checked() {
        let config = YearsetConfig {
            schema_version: "0.9.0".to_string(),
            ..YearsetConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ValidationError::VersionMismatch { .. })
        ));
    }
}
