//! Error handling module for the rivt CLI.
//!
//! This module provides custom error types using `thiserror` for structured
//! error handling throughout the application.

use thiserror::Error;

/// Main error type for the rivt CLI application.
///
/// This enum represents all run-aborting errors. Per-case pipeline failures
/// (compile errors, emulation faults, timeouts, comparison failures) are
/// tracked as case statuses instead, so that one bad fixture never aborts
/// a run.
#[derive(Error, Debug)]
pub enum RivtError {
    /// Error when a required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error when CLI input is invalid (e.g. an out-of-range section
    /// selector). Raised before any test case runs.
    #[error("Usage error: {0}")]
    Usage(String),

    /// Error when a numeric comparison file violates the expected format:
    /// a bad row tag, a dimension mismatch, or an unparseable value.
    #[error("Format error: {0}")]
    Format(String),

    /// Error when a numeric comparison finds a value outside tolerance.
    #[error("Comparison mismatch: {0}")]
    Mismatch(String),

    /// Error when IO operations fail.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RivtError {
    /// Process exit code for this error.
    ///
    /// Usage and format violations exit with 2, numeric mismatches with 1,
    /// matching the comparator CLI contract. Everything else is a generic
    /// failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage(_) | Self::Format(_) => 2,
            Self::Mismatch(_) => 1,
            Self::Config(_) | Self::Io(_) => 1,
        }
    }
}

/// Result type alias using RivtError.
///
/// This type alias simplifies function signatures by providing
/// a consistent result type throughout the application.
pub type Result<T> = std::result::Result<T, RivtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = RivtError::Config("missing field".to_string());
        assert_eq!(err.to_string(), "Configuration error: missing field");
    }

    #[test]
    fn test_usage_error_display() {
        let err = RivtError::Usage("invalid section selector: 42".to_string());
        assert_eq!(
            err.to_string(),
            "Usage error: invalid section selector: 42"
        );
    }

    #[test]
    fn test_format_error_display() {
        let err = RivtError::Format("bad tag at row 3".to_string());
        assert_eq!(err.to_string(), "Format error: bad tag at row 3");
    }

    #[test]
    fn test_mismatch_error_display() {
        let err = RivtError::Mismatch("value 2 at layer 1 is wrong".to_string());
        assert_eq!(
            err.to_string(),
            "Comparison mismatch: value 2 at layer 1 is wrong"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let rivt_err: RivtError = io_err.into();
        assert!(matches!(rivt_err, RivtError::Io(_)));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(RivtError::Usage("x".into()).exit_code(), 2);
        assert_eq!(RivtError::Format("x".into()).exit_code(), 2);
        assert_eq!(RivtError::Mismatch("x".into()).exit_code(), 1);
        assert_eq!(RivtError::Config("x".into()).exit_code(), 1);
    }
}
