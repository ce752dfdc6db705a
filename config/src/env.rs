//! Raw and validated process environment.
//!
//! [`RawEnvironment`] is the untyped input read once at startup.
//! [`validate_environment`] checks it against the schema and produces a
//! [`ValidatedEnvironment`], or fails with every violation at once.

use crate::{schema, ConfigurationError, Mode, Violation};
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fmt;

/// Environment variables recognized by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnvVar {
    NodeEnv,
    NextPublicAppUrl,
    DatabaseUrl,
    DirectUrl,
    NextauthUrl,
    NextauthSecret,
    OpenaiApiKey,
    AnthropicApiKey,
    GoogleClientId,
    GoogleClientSecret,
    GoogleCloudKey,
    StripeSecretKey,
    StripeWebhookSecret,
    StripePublishableKey,
    RedisUrl,
    ResendApiKey,
    SentryDsn,
    PosthogKey,
    PosthogHost,
}

impl EnvVar {
    /// Every recognized variable, in schema-declaration order.
    pub const ALL: [EnvVar; 19] = [
        EnvVar::NodeEnv,
        EnvVar::NextPublicAppUrl,
        EnvVar::DatabaseUrl,
        EnvVar::DirectUrl,
        EnvVar::NextauthUrl,
        EnvVar::NextauthSecret,
        EnvVar::OpenaiApiKey,
        EnvVar::AnthropicApiKey,
        EnvVar::GoogleClientId,
        EnvVar::GoogleClientSecret,
        EnvVar::GoogleCloudKey,
        EnvVar::StripeSecretKey,
        EnvVar::StripeWebhookSecret,
        EnvVar::StripePublishableKey,
        EnvVar::RedisUrl,
        EnvVar::ResendApiKey,
        EnvVar::SentryDsn,
        EnvVar::PosthogKey,
        EnvVar::PosthogHost,
    ];

    /// Canonical environment variable name.
    pub const fn as_str(self) -> &'static str {
        match self {
            EnvVar::NodeEnv => "NODE_ENV",
            EnvVar::NextPublicAppUrl => "NEXT_PUBLIC_APP_URL",
            EnvVar::DatabaseUrl => "DATABASE_URL",
            EnvVar::DirectUrl => "DIRECT_URL",
            EnvVar::NextauthUrl => "NEXTAUTH_URL",
            EnvVar::NextauthSecret => "NEXTAUTH_SECRET",
            EnvVar::OpenaiApiKey => "OPENAI_API_KEY",
            EnvVar::AnthropicApiKey => "ANTHROPIC_API_KEY",
            EnvVar::GoogleClientId => "GOOGLE_CLIENT_ID",
            EnvVar::GoogleClientSecret => "GOOGLE_CLIENT_SECRET",
            EnvVar::GoogleCloudKey => "GOOGLE_CLOUD_KEY",
            EnvVar::StripeSecretKey => "STRIPE_SECRET_KEY",
            EnvVar::StripeWebhookSecret => "STRIPE_WEBHOOK_SECRET",
            EnvVar::StripePublishableKey => "STRIPE_PUBLISHABLE_KEY",
            EnvVar::RedisUrl => "REDIS_URL",
            EnvVar::ResendApiKey => "RESEND_API_KEY",
            EnvVar::SentryDsn => "SENTRY_DSN",
            EnvVar::PosthogKey => "POSTHOG_KEY",
            EnvVar::PosthogHost => "POSTHOG_HOST",
        }
    }
}

impl fmt::Display for EnvVar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Untyped environment mapping, read once at startup.
///
/// Keys are kept in a `BTreeMap` so iteration order is deterministic.
/// Variables whose values could not be read as UTF-8 are remembered as
/// rejected and reported by validation next to every other violation.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawEnvironment {
    vars: BTreeMap<String, String>,
    rejected: BTreeSet<String>,
}

impl RawEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every recognized variable from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var_os(key))
    }

    /// Read every recognized variable through `lookup`.
    ///
    /// Values that are not valid UTF-8 are not stored; the variable is
    /// marked rejected so validation fails closed on it.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<OsString>,
    {
        let mut raw = Self::new();
        for var in EnvVar::ALL {
            match lookup(var.as_str()).map(OsString::into_string) {
                None => {}
                Some(Ok(value)) => {
                    raw.set(var.as_str(), value);
                }
                Some(Err(_)) => {
                    raw.reject(var.as_str());
                }
            }
        }
        raw
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        let key = key.into();
        self.rejected.remove(&key);
        self.vars.insert(key, value.into());
        self
    }

    /// Mark a variable as present but unreadable.
    pub fn reject(&mut self, key: impl Into<String>) -> &mut Self {
        let key = key.into();
        self.vars.remove(&key);
        self.rejected.insert(key);
        self
    }

    /// Builder-style method to set a variable.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Builder-style method to remove a variable.
    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self.rejected.remove(key);
        self
    }

    /// Get a variable by name.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Get a recognized variable.
    pub fn var(&self, var: EnvVar) -> Option<&str> {
        self.get(var.as_str())
    }

    /// Whether a recognized variable is set to a non-empty value.
    pub fn is_present(&self, var: EnvVar) -> bool {
        self.var(var).is_some_and(|v| !v.is_empty())
    }

    /// Whether a recognized variable held a non-UTF-8 value.
    pub fn is_rejected(&self, var: EnvVar) -> bool {
        self.rejected.contains(var.as_str())
    }

    /// The raw, unvalidated mode string.
    pub fn mode(&self) -> Option<&str> {
        self.var(EnvVar::NodeEnv)
    }

    /// Number of variables held.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether no variables are held.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut raw = Self::new();
        for (key, value) in iter {
            raw.set(key, value);
        }
        raw
    }
}

// Values may hold secrets, so only keys are printed.
impl fmt::Debug for RawEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawEnvironment")
            .field("keys", &self.vars.keys().collect::<Vec<_>>())
            .field("rejected", &self.rejected)
            .finish()
    }
}

/// Typed, schema-checked environment.
///
/// Values are exactly the input strings; nothing is trimmed or coerced.
/// Optional variables that were set to an empty string stay `Some("")`.
#[derive(Clone, PartialEq, Eq)]
pub struct ValidatedEnvironment {
    pub mode: Mode,
    pub app_url: String,

    pub database_url: String,
    pub direct_url: Option<String>,

    pub nextauth_url: String,
    pub nextauth_secret: String,

    pub openai_api_key: String,
    pub anthropic_api_key: Option<String>,

    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub google_cloud_key: Option<String>,

    pub stripe_secret_key: Option<String>,
    pub stripe_webhook_secret: Option<String>,
    pub stripe_publishable_key: Option<String>,

    pub redis_url: Option<String>,
    pub resend_api_key: Option<String>,

    pub sentry_dsn: Option<String>,
    pub posthog_key: Option<String>,
    pub posthog_host: Option<String>,
}

impl ValidatedEnvironment {
    pub fn is_development(&self) -> bool {
        self.mode == Mode::Development
    }

    pub fn is_production(&self) -> bool {
        self.mode == Mode::Production
    }

    pub fn is_test(&self) -> bool {
        self.mode == Mode::Test
    }

    /// Value of a recognized variable, if set.
    pub fn get(&self, var: EnvVar) -> Option<&str> {
        match var {
            EnvVar::NodeEnv => Some(self.mode.as_str()),
            EnvVar::NextPublicAppUrl => Some(self.app_url.as_str()),
            EnvVar::DatabaseUrl => Some(self.database_url.as_str()),
            EnvVar::DirectUrl => self.direct_url.as_deref(),
            EnvVar::NextauthUrl => Some(self.nextauth_url.as_str()),
            EnvVar::NextauthSecret => Some(self.nextauth_secret.as_str()),
            EnvVar::OpenaiApiKey => Some(self.openai_api_key.as_str()),
            EnvVar::AnthropicApiKey => self.anthropic_api_key.as_deref(),
            EnvVar::GoogleClientId => self.google_client_id.as_deref(),
            EnvVar::GoogleClientSecret => self.google_client_secret.as_deref(),
            EnvVar::GoogleCloudKey => self.google_cloud_key.as_deref(),
            EnvVar::StripeSecretKey => self.stripe_secret_key.as_deref(),
            EnvVar::StripeWebhookSecret => self.stripe_webhook_secret.as_deref(),
            EnvVar::StripePublishableKey => self.stripe_publishable_key.as_deref(),
            EnvVar::RedisUrl => self.redis_url.as_deref(),
            EnvVar::ResendApiKey => self.resend_api_key.as_deref(),
            EnvVar::SentryDsn => self.sentry_dsn.as_deref(),
            EnvVar::PosthogKey => self.posthog_key.as_deref(),
            EnvVar::PosthogHost => self.posthog_host.as_deref(),
        }
    }

    /// Whether a variable is set to a non-empty value.
    pub fn is_present(&self, var: EnvVar) -> bool {
        self.get(var).is_some_and(|v| !v.is_empty())
    }

    /// Grouped, read-only view of the environment.
    pub fn sections(&self) -> EnvironmentSections<'_> {
        EnvironmentSections {
            database: DatabaseSection {
                url: &self.database_url,
                direct_url: self.direct_url.as_deref(),
            },
            auth: AuthSection {
                secret: &self.nextauth_secret,
                url: &self.nextauth_url,
                google: GoogleOAuthSection {
                    client_id: self.google_client_id.as_deref(),
                    client_secret: self.google_client_secret.as_deref(),
                },
            },
            ai: AiKeysSection {
                openai_api_key: &self.openai_api_key,
                anthropic_api_key: self.anthropic_api_key.as_deref(),
                google_api_key: self.google_cloud_key.as_deref(),
            },
            stripe: StripeSection {
                secret_key: self.stripe_secret_key.as_deref(),
                publishable_key: self.stripe_publishable_key.as_deref(),
                webhook_secret: self.stripe_webhook_secret.as_deref(),
            },
            app: AppSection {
                url: &self.app_url,
                mode: self.mode,
            },
        }
    }
}

fn redacted(value: Option<&str>) -> &'static str {
    match value {
        Some(_) => "<redacted>",
        None => "<unset>",
    }
}

impl fmt::Debug for ValidatedEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedEnvironment")
            .field("mode", &self.mode)
            .field("app_url", &self.app_url)
            .field("database_url", &redacted(Some(self.database_url.as_str())))
            .field("direct_url", &redacted(self.direct_url.as_deref()))
            .field("nextauth_url", &self.nextauth_url)
            .field("nextauth_secret", &redacted(Some(self.nextauth_secret.as_str())))
            .field("openai_api_key", &redacted(Some(self.openai_api_key.as_str())))
            .field("anthropic_api_key", &redacted(self.anthropic_api_key.as_deref()))
            .field("google_client_id", &self.google_client_id)
            .field("google_client_secret", &redacted(self.google_client_secret.as_deref()))
            .field("google_cloud_key", &redacted(self.google_cloud_key.as_deref()))
            .field("stripe_secret_key", &redacted(self.stripe_secret_key.as_deref()))
            .field("stripe_webhook_secret", &redacted(self.stripe_webhook_secret.as_deref()))
            .field("stripe_publishable_key", &self.stripe_publishable_key)
            .field("redis_url", &redacted(self.redis_url.as_deref()))
            .field("resend_api_key", &redacted(self.resend_api_key.as_deref()))
            .field("sentry_dsn", &redacted(self.sentry_dsn.as_deref()))
            .field("posthog_key", &redacted(self.posthog_key.as_deref()))
            .field("posthog_host", &self.posthog_host)
            .finish()
    }
}

/// Environment grouped by concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentSections<'a> {
    pub database: DatabaseSection<'a>,
    pub auth: AuthSection<'a>,
    pub ai: AiKeysSection<'a>,
    pub stripe: StripeSection<'a>,
    pub app: AppSection<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseSection<'a> {
    pub url: &'a str,
    /// Direct (non-pooled) connection
    pub direct_url: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthSection<'a> {
    pub secret: &'a str,
    pub url: &'a str,
    pub google: GoogleOAuthSection<'a>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoogleOAuthSection<'a> {
    pub client_id: Option<&'a str>,
    pub client_secret: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiKeysSection<'a> {
    pub openai_api_key: &'a str,
    pub anthropic_api_key: Option<&'a str>,
    /// Google Cloud key used for OCR
    pub google_api_key: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripeSection<'a> {
    pub secret_key: Option<&'a str>,
    pub publishable_key: Option<&'a str>,
    pub webhook_secret: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSection<'a> {
    pub url: &'a str,
    pub mode: Mode,
}

/// Validate a raw environment.
///
/// Every schema rule is evaluated; on failure the error carries all
/// violations in schema order. On success every field equals its input
/// string.
pub fn validate_environment(
    raw: &RawEnvironment,
) -> Result<ValidatedEnvironment, ConfigurationError> {
    let violations = schema::check(raw);
    if !violations.is_empty() {
        return Err(ConfigurationError::Invalid(violations));
    }

    let mode_value = required(raw, EnvVar::NodeEnv)?;
    let mode = Mode::parse(mode_value).ok_or_else(|| {
        ConfigurationError::Invalid(vec![Violation::new(
            EnvVar::NodeEnv.as_str(),
            format!("unrecognized mode '{mode_value}'"),
        )])
    })?;

    Ok(ValidatedEnvironment {
        mode,
        app_url: required(raw, EnvVar::NextPublicAppUrl)?.to_owned(),
        database_url: required(raw, EnvVar::DatabaseUrl)?.to_owned(),
        direct_url: optional(raw, EnvVar::DirectUrl),
        nextauth_url: required(raw, EnvVar::NextauthUrl)?.to_owned(),
        nextauth_secret: required(raw, EnvVar::NextauthSecret)?.to_owned(),
        openai_api_key: required(raw, EnvVar::OpenaiApiKey)?.to_owned(),
        anthropic_api_key: optional(raw, EnvVar::AnthropicApiKey),
        google_client_id: optional(raw, EnvVar::GoogleClientId),
        google_client_secret: optional(raw, EnvVar::GoogleClientSecret),
        google_cloud_key: optional(raw, EnvVar::GoogleCloudKey),
        stripe_secret_key: optional(raw, EnvVar::StripeSecretKey),
        stripe_webhook_secret: optional(raw, EnvVar::StripeWebhookSecret),
        stripe_publishable_key: optional(raw, EnvVar::StripePublishableKey),
        redis_url: optional(raw, EnvVar::RedisUrl),
        resend_api_key: optional(raw, EnvVar::ResendApiKey),
        sentry_dsn: optional(raw, EnvVar::SentryDsn),
        posthog_key: optional(raw, EnvVar::PosthogKey),
        posthog_host: optional(raw, EnvVar::PosthogHost),
    })
}

fn required(raw: &RawEnvironment, var: EnvVar) -> Result<&str, ConfigurationError> {
    raw.var(var).ok_or_else(|| {
        ConfigurationError::Invalid(vec![Violation::new(var.as_str(), schema::REQUIRED)])
    })
}

fn optional(raw: &RawEnvironment, var: EnvVar) -> Option<String> {
    raw.var(var).map(str::to_owned)
}

/// Serialized access to the process environment for tests.
#[cfg(test)]
pub(crate) mod process_env {
    use super::EnvVar;
    use std::ffi::OsString;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    fn env_lock() -> MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run `f` with every recognized variable cleared except `vars`, then
    /// restore the previous values.
    pub(crate) fn with_vars<R>(vars: &[(&str, OsString)], f: impl FnOnce() -> R) -> R {
        let _guard = env_lock();
        let saved: Vec<(EnvVar, Option<OsString>)> = EnvVar::ALL
            .into_iter()
            .map(|var| (var, std::env::var_os(var.as_str())))
            .collect();

        for var in EnvVar::ALL {
            match vars.iter().find(|(key, _)| *key == var.as_str()) {
                Some((key, value)) => std::env::set_var(key, value),
                None => std::env::remove_var(var.as_str()),
            }
        }
        let out = f();

        for (var, value) in saved {
            match value {
                Some(value) => std::env::set_var(var.as_str(), value),
                None => std::env::remove_var(var.as_str()),
            }
        }
        out
    }

    /// A value that is not valid UTF-8.
    #[cfg(unix)]
    pub(crate) fn non_utf8() -> OsString {
        use std::os::unix::ffi::OsStringExt;
        OsString::from_vec(vec![0xff, 0xfe])
    }
}
