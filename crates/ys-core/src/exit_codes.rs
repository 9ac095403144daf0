//! Exit codes for the ys-core CLI.
//!
//! Exit code ranges:
//! - 0: success
//! - 10-19: user/input errors (recoverable by changing arguments or data)
//! - 20-29: I/O and serialization errors

use ys_common::{Error, ErrorCategory};
use ys_config::ValidationError;

/// Exit codes for ys-core operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed.
    Clean = 0,

    /// Invalid arguments or configuration
    ArgsError = 10,

    /// Sampling could not be carried out (capacity, rate, or weights)
    SamplingError = 11,

    /// Input series or plan has the wrong shape
    InputError = 12,

    /// I/O or serialization error
    IoError = 20,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        self == ExitCode::Clean
    }

    /// Check if this exit code is a user/input error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    /// Check if this exit code is an I/O error (codes 20-29).
    pub fn is_io_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Error code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::SamplingError => "ERR_SAMPLING",
            ExitCode::InputError => "ERR_INPUT",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Config => ExitCode::ArgsError,
            ErrorCategory::Sampling => ExitCode::SamplingError,
            ErrorCategory::Shape => ExitCode::InputError,
            ErrorCategory::Io => ExitCode::IoError,
        }
    }
}

impl From<&ValidationError> for ExitCode {
    fn from(err: &ValidationError) -> Self {
        match err {
            ValidationError::IoError(_) => ExitCode::IoError,
            ValidationError::ParseError(_)
            | ValidationError::InvalidValue { .. }
            | ValidationError::VersionMismatch { .. } => ExitCode::ArgsError,
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        assert!(ExitCode::Clean.is_success());
        assert!(ExitCode::ArgsError.is_user_error());
        assert!(ExitCode::InputError.is_user_error());
        assert!(ExitCode::IoError.is_io_error());
        assert!(!ExitCode::SamplingError.is_io_error());
    }

    #[test]
    fn test_error_mapping() {
        let capacity = Error::Capacity {
            requested: 5,
            available: 2,
        };
        assert_eq!(ExitCode::from(&capacity), ExitCode::SamplingError);
        assert_eq!(ExitCode::from(&Error::EmptyMatrix), ExitCode::InputError);
        assert_eq!(
            ExitCode::from(&Error::Config("bad".into())),
            ExitCode::ArgsError
        );
        let io = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(ExitCode::from(&io), ExitCode::IoError);
    }

    #[test]
    fn test_validation_mapping() {
        assert_eq!(
            ExitCode::from(&ValidationError::IoError("x".into())),
            ExitCode::IoError
        );
        assert_eq!(
            ExitCode::from(&ValidationError::ParseError("x".into())),
            ExitCode::ArgsError
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ExitCode::InputError.to_string(), "ERR_INPUT (12)");
    }
}
