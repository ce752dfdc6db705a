//! Error types for environment validation and configuration lookups.

use std::fmt;
use thiserror::Error;

/// A single violated environment constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Environment variable name
    pub field: String,
    /// Human readable reason
    pub reason: String,
}

impl Violation {
    /// Create a new violation for a field.
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(Violation::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// The environment could not be turned into a usable configuration.
///
/// Startup fails with this error; no partial configuration is ever published.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// One or more schema constraints failed. Violations are kept in
    /// schema-declaration order.
    #[error("invalid environment variables:\n{}", join_violations(.0))]
    Invalid(Vec<Violation>),

    #[error("production environment is not properly configured")]
    ProductionNotReady,
}

impl ConfigurationError {
    /// Violations carried by an `Invalid` error, empty otherwise.
    pub fn violations(&self) -> &[Violation] {
        match self {
            ConfigurationError::Invalid(violations) => violations,
            _ => &[],
        }
    }

    /// Whether any violation refers to `field`.
    pub fn mentions(&self, field: &str) -> bool {
        match self {
            ConfigurationError::Invalid(violations) => violations.iter().any(|v| v.field == field),
            ConfigurationError::ProductionNotReady => false,
        }
    }
}

/// A feature flag name outside the declared set was requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown feature flag: {0}")]
pub struct UnknownFeatureError(pub String);

/// An exam variant outside the supported set was requested.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown exam type: {0}")]
pub struct UnknownExamTypeError(pub String);

/// Any error produced by this crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    UnknownFeature(#[from] UnknownFeatureError),

    #[error(transparent)]
    UnknownExamType(#[from] UnknownExamTypeError),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ConfigurationError::Invalid(vec![
            Violation::new("DATABASE_URL", "Required"),
            Violation::new(
                "NEXTAUTH_SECRET",
                "NextAuth secret must be at least 32 characters",
            ),
        ]);
        assert_eq!(
            err.to_string(),
            "invalid environment variables:\n\
             DATABASE_URL: Required\n\
             NEXTAUTH_SECRET: NextAuth secret must be at least 32 characters"
        );

        assert_eq!(
            ConfigurationError::ProductionNotReady.to_string(),
            "production environment is not properly configured"
        );

        let err = UnknownExamTypeError("ielts".into());
        assert_eq!(err.to_string(), "unknown exam type: ielts");

        let err = UnknownFeatureError("darkMode".into());
        assert_eq!(err.to_string(), "unknown feature flag: darkMode");
    }

    #[test]
    fn mentions_checks_violated_fields() {
        let err = ConfigurationError::Invalid(vec![Violation::new("OPENAI_API_KEY", "Required")]);
        assert!(err.mentions("OPENAI_API_KEY"));
        assert!(!err.mentions("DATABASE_URL"));
        assert_eq!(err.violations().len(), 1);

        let err = ConfigurationError::ProductionNotReady;
        assert!(!err.mentions("NEXT_PUBLIC_APP_URL"));
        assert!(err.violations().is_empty());
    }

    #[test]
    fn umbrella_error_is_transparent() {
        let err: Error = UnknownExamTypeError("ielts".into()).into();
        assert_eq!(err.to_string(), "unknown exam type: ielts");
    }
}
