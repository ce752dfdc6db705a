//! Environment schema definition and validation.
//!
//! The schema is an ordered list of field rules. Validation evaluates every
//! rule and collects all violations instead of stopping at the first one.

use crate::{EnvVar, RawEnvironment, Violation};
use url::Url;

/// Reason reported for a required variable that is absent.
pub const REQUIRED: &str = "Required";

/// Reason reported for a value that is not an absolute URL.
pub const INVALID_URL: &str = "Invalid url";

/// Reason reported for a value that could not be read as UTF-8.
pub const INVALID_UTF8: &str = "must be valid UTF-8";

/// Constraint applied to a single environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Required; must equal one of the listed values exactly.
    OneOf(&'static [&'static str]),
    /// Required; must parse as an absolute URL.
    Url,
    /// Required; must contain at least `min` characters. Characters are
    /// Unicode scalar values, not UTF-16 code units or bytes.
    MinLength { min: usize, message: &'static str },
    /// Any string, or absent.
    Optional,
}

/// Rule binding a constraint to an environment variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Variable the rule applies to
    pub var: EnvVar,
    /// Constraint the value must satisfy
    pub constraint: Constraint,
}

impl FieldRule {
    const fn new(var: EnvVar, constraint: Constraint) -> Self {
        Self { var, constraint }
    }

    /// Whether the variable must be present.
    pub fn required(&self) -> bool {
        !matches!(self.constraint, Constraint::Optional)
    }

    /// Check a value against this rule, returning the violation if any.
    pub fn check(&self, value: Option<&str>) -> Option<Violation> {
        let reason = match (self.constraint, value) {
            (Constraint::Optional, _) => return None,
            (_, None) => REQUIRED.to_string(),
            (Constraint::OneOf(allowed), Some(v)) => {
                if allowed.contains(&v) {
                    return None;
                }
                format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    allowed
                        .iter()
                        .map(|a| format!("'{a}'"))
                        .collect::<Vec<_>>()
                        .join(" | "),
                    v
                )
            }
            (Constraint::Url, Some(v)) => {
                if Url::parse(v).is_ok() {
                    return None;
                }
                INVALID_URL.to_string()
            }
            (Constraint::MinLength { min, message }, Some(v)) => {
                if v.chars().count() >= min {
                    return None;
                }
                message.to_string()
            }
        };

        Some(Violation::new(self.var.as_str(), reason))
    }
}

/// The environment schema, in declaration order.
pub const ENVIRONMENT_SCHEMA: [FieldRule; 19] = [
    // App
    FieldRule::new(
        EnvVar::NodeEnv,
        Constraint::OneOf(&["development", "production", "test"]),
    ),
    FieldRule::new(EnvVar::NextPublicAppUrl, Constraint::Url),
    // Database
    FieldRule::new(
        EnvVar::DatabaseUrl,
        Constraint::MinLength {
            min: 1,
            message: "Database URL is required",
        },
    ),
    FieldRule::new(EnvVar::DirectUrl, Constraint::Optional),
    // Authentication
    FieldRule::new(EnvVar::NextauthUrl, Constraint::Url),
    FieldRule::new(
        EnvVar::NextauthSecret,
        Constraint::MinLength {
            min: 32,
            message: "NextAuth secret must be at least 32 characters",
        },
    ),
    // AI providers
    FieldRule::new(
        EnvVar::OpenaiApiKey,
        Constraint::MinLength {
            min: 1,
            message: "OpenAI API key is required",
        },
    ),
    FieldRule::new(EnvVar::AnthropicApiKey, Constraint::Optional),
    // Google
    FieldRule::new(EnvVar::GoogleClientId, Constraint::Optional),
    FieldRule::new(EnvVar::GoogleClientSecret, Constraint::Optional),
    FieldRule::new(EnvVar::GoogleCloudKey, Constraint::Optional),
    // Payments
    FieldRule::new(EnvVar::StripeSecretKey, Constraint::Optional),
    FieldRule::new(EnvVar::StripeWebhookSecret, Constraint::Optional),
    FieldRule::new(EnvVar::StripePublishableKey, Constraint::Optional),
    // External services
    FieldRule::new(EnvVar::RedisUrl, Constraint::Optional),
    FieldRule::new(EnvVar::ResendApiKey, Constraint::Optional),
    // Monitoring and analytics
    FieldRule::new(EnvVar::SentryDsn, Constraint::Optional),
    FieldRule::new(EnvVar::PosthogKey, Constraint::Optional),
    FieldRule::new(EnvVar::PosthogHost, Constraint::Optional),
];

/// Validate a raw environment against the schema.
///
/// Returns every violation in schema order; an empty vector means the
/// environment is valid. A variable rejected as non-UTF-8 is reported in
/// its rule's position, whatever its constraint.
pub fn check(raw: &RawEnvironment) -> Vec<Violation> {
    ENVIRONMENT_SCHEMA
        .iter()
        .filter_map(|rule| {
            if raw.is_rejected(rule.var) {
                Some(Violation::new(rule.var.as_str(), INVALID_UTF8))
            } else {
                rule.check(raw.var(rule.var))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(var: EnvVar) -> FieldRule {
        ENVIRONMENT_SCHEMA
            .iter()
            .copied()
            .find(|r| r.var == var)
            .unwrap()
    }

    #[test]
    fn schema_covers_every_variable_in_order() {
        let vars: Vec<EnvVar> = ENVIRONMENT_SCHEMA.iter().map(|r| r.var).collect();
        assert_eq!(vars, EnvVar::ALL.to_vec());
    }

    #[test]
    fn required_fields() {
        let required: Vec<&str> = ENVIRONMENT_SCHEMA
            .iter()
            .filter(|r| r.required())
            .map(|r| r.var.as_str())
            .collect();
        assert_eq!(
            required,
            vec![
                "NODE_ENV",
                "NEXT_PUBLIC_APP_URL",
                "DATABASE_URL",
                "NEXTAUTH_URL",
                "NEXTAUTH_SECRET",
                "OPENAI_API_KEY",
            ]
        );
    }

    #[test]
    fn enum_rejects_unknown_mode() {
        let violation = rule(EnvVar::NodeEnv).check(Some("staging")).unwrap();
        assert_eq!(violation.field, "NODE_ENV");
        assert_eq!(
            violation.reason,
            "Invalid enum value. Expected 'development' | 'production' | 'test', received 'staging'"
        );
        assert!(rule(EnvVar::NodeEnv).check(Some("test")).is_none());
    }

    #[test]
    fn url_must_be_absolute() {
        let url_rule = rule(EnvVar::NextPublicAppUrl);
        assert!(url_rule.check(Some("https://x.test")).is_none());
        assert!(url_rule.check(Some("http://localhost:3000")).is_none());
        assert_eq!(url_rule.check(Some("/relative")).unwrap().reason, INVALID_URL);
        assert_eq!(url_rule.check(Some("")).unwrap().reason, INVALID_URL);
    }

    #[test]
    fn missing_required_reports_required() {
        let violation = rule(EnvVar::OpenaiApiKey).check(None).unwrap();
        assert_eq!(violation.reason, REQUIRED);
    }

    #[test]
    fn empty_required_reports_custom_message() {
        let violation = rule(EnvVar::DatabaseUrl).check(Some("")).unwrap();
        assert_eq!(violation.reason, "Database URL is required");
    }

    #[test]
    fn secret_length_boundary() {
        let secret_rule = rule(EnvVar::NextauthSecret);
        assert!(secret_rule.check(Some("a".repeat(32).as_str())).is_none());
        assert!(secret_rule.check(Some("a".repeat(31).as_str())).is_some());
        // Length is counted in characters, not bytes.
        assert!(secret_rule.check(Some("ä".repeat(32).as_str())).is_none());
        // 16 emoji are 32 UTF-16 code units but only 16 characters.
        assert!(secret_rule.check(Some("😀".repeat(16).as_str())).is_some());
    }

    #[test]
    fn optional_accepts_anything() {
        let optional = rule(EnvVar::RedisUrl);
        assert!(optional.check(None).is_none());
        assert!(optional.check(Some("")).is_none());
        assert!(optional.check(Some("not a url")).is_none());
    }

    #[test]
    fn rejected_values_keep_schema_order() {
        let mut raw = RawEnvironment::new()
            .with("NODE_ENV", "production")
            .with("NEXT_PUBLIC_APP_URL", "https://x.test")
            .with("NEXTAUTH_URL", "https://x.test")
            .with("NEXTAUTH_SECRET", "short")
            .with("OPENAI_API_KEY", "sk-abc");
        raw.reject("POSTHOG_HOST").reject("NODE_ENV");

        let violations = check(&raw);
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["NODE_ENV", "DATABASE_URL", "NEXTAUTH_SECRET", "POSTHOG_HOST"]
        );
        assert_eq!(violations[0].reason, INVALID_UTF8);
        assert_eq!(violations[3].reason, INVALID_UTF8);
    }

    #[test]
    fn check_aggregates_in_schema_order() {
        let raw = RawEnvironment::new()
            .with("NODE_ENV", "development")
            .with("NEXTAUTH_SECRET", "short");
        let fields: Vec<String> = check(&raw).into_iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                "NEXT_PUBLIC_APP_URL",
                "DATABASE_URL",
                "NEXTAUTH_URL",
                "NEXTAUTH_SECRET",
                "OPENAI_API_KEY",
            ]
        );
    }
}
