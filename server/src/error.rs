//! Unified error handling for the bootstrap.

use writingcoach_config::ConfigurationError;

/// Startup error type.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Logging setup failed: {0}")]
    Telemetry(String),

    #[error("Report serialization failed: {0}")]
    Report(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BootstrapError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            BootstrapError::Configuration(_) => 2,
            _ => 1,
        }
    }
}

/// Result type alias for the bootstrap.
pub type Result<T> = std::result::Result<T, BootstrapError>;

#[cfg(test)]
mod tests {
    use super::*;
    use writingcoach_config::Violation;

    #[test]
    fn configuration_errors_exit_with_two() {
        let err: BootstrapError =
            ConfigurationError::Invalid(vec![Violation::new("DATABASE_URL", "Required")]).into();
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            err.to_string(),
            "Configuration error: invalid environment variables:\nDATABASE_URL: Required"
        );

        let err: BootstrapError = ConfigurationError::ProductionNotReady.into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = BootstrapError::Telemetry("already set".into());
        assert_eq!(err.exit_code(), 1);

        let err: BootstrapError = std::io::Error::other("broken pipe").into();
        assert_eq!(err.exit_code(), 1);
    }
}
