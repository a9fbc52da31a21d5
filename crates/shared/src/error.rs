//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// This is the error surfaced to the operator of a binary. Domain crates keep
/// their own richer enums and convert into this one at the edge.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected before anything was persisted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The transaction store or rate provider failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// The export artifact could not be produced.
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AppError {
    /// Returns the error code used in logs and operator messages.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Export(_) => "EXPORT_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }

    /// Returns the process exit code a binary should use for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::NotFound(_) => 2,
            Self::Configuration(_) => 78,
            Self::ExternalService(_) | Self::Export(_) => 1,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::ExternalService(String::new()).error_code(),
            "EXTERNAL_SERVICE_ERROR"
        );
        assert_eq!(AppError::Export(String::new()).error_code(), "EXPORT_ERROR");
        assert_eq!(
            AppError::Configuration(String::new()).error_code(),
            "CONFIGURATION_ERROR"
        );
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::Validation(String::new()).exit_code(), 2);
        assert_eq!(AppError::NotFound(String::new()).exit_code(), 2);
        assert_eq!(AppError::Configuration(String::new()).exit_code(), 78);
        assert_eq!(AppError::ExternalService(String::new()).exit_code(), 1);
        assert_eq!(AppError::Export(String::new()).exit_code(), 1);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::ExternalService("msg".into()).to_string(),
            "External service error: msg"
        );
        assert_eq!(AppError::Export("msg".into()).to_string(), "Export error: msg");
        assert_eq!(
            AppError::Configuration("msg".into()).to_string(),
            "Configuration error: msg"
        );
    }
}
