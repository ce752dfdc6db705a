//! Once-per-process configuration resolution.
//!
//! [`initialize`] turns a raw environment into a [`Configuration`] or fails
//! atomically. [`Resolver`] runs it at most once and hands every later
//! caller the same outcome: the shared configuration, or a clone of the
//! original error.

use crate::app::{build_active_configuration, ActiveConfiguration, AppIdentity};
use crate::exam::{ExamDomainConfig, ScoringConfig, EXAM_CONFIG};
use crate::features::{derive_feature_availability, FeatureAvailability};
use crate::flags::FeatureFlags;
use crate::profile::resolve_active_profile;
use crate::{
    validate_environment, ConfigurationError, EnvVar, Mode, RawEnvironment, UnknownExamTypeError,
    UnknownFeatureError, ValidatedEnvironment,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

/// Keys a production process cannot run without.
pub const CRITICAL_KEYS: [EnvVar; 3] = [
    EnvVar::DatabaseUrl,
    EnvVar::NextauthSecret,
    EnvVar::NextPublicAppUrl,
];

/// Keys whose absence is reported as a warning outside production.
pub const DEVELOPMENT_KEYS: [EnvVar; 3] = [
    EnvVar::DatabaseUrl,
    EnvVar::NextauthSecret,
    EnvVar::OpenaiApiKey,
];

/// Everything downstream consumers may read.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub env: ValidatedEnvironment,
    pub features: FeatureAvailability,
    pub flags: FeatureFlags,
    pub active: ActiveConfiguration,
    pub exam: &'static ExamDomainConfig,
}

impl Configuration {
    pub fn mode(&self) -> Mode {
        self.env.mode
    }

    /// Whether a named feature flag is enabled.
    pub fn is_feature_enabled(&self, name: &str) -> Result<bool, UnknownFeatureError> {
        self.flags.is_enabled_by_name(name)
    }

    pub fn is_environment_ready(&self) -> bool {
        is_environment_ready(&self.env)
    }

    /// Scoring configuration for an exam variant given by name.
    pub fn exam_scoring_config(
        &self,
        exam_type: &str,
    ) -> Result<&'static ScoringConfig, UnknownExamTypeError> {
        crate::exam::get_exam_scoring_config(exam_type)
    }
}

/// Whether the database URL, auth secret and application URL are all set.
pub fn is_environment_ready(env: &ValidatedEnvironment) -> bool {
    CRITICAL_KEYS.iter().all(|key| env.is_present(*key))
}

/// Development keys that are missing from a development environment.
///
/// Empty in every other mode; in production the schema alone decides.
pub fn missing_development_keys(raw: &RawEnvironment) -> Vec<EnvVar> {
    if raw.mode() != Some(Mode::Development.as_str()) {
        return Vec::new();
    }
    DEVELOPMENT_KEYS
        .into_iter()
        .filter(|key| !raw.is_present(*key))
        .collect()
}

/// Validate the environment and build the full configuration.
///
/// Either every published structure is built or an error is returned;
/// nothing partial escapes.
pub fn initialize(raw: &RawEnvironment) -> Result<Configuration, ConfigurationError> {
    let missing = missing_development_keys(raw);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|key| key.as_str()).collect();
        warn!(
            missing = %names.join(", "),
            "missing development environment variables; some features may not work properly"
        );
    }

    let env = validate_environment(raw)?;
    let profile = resolve_active_profile(env.mode.as_str());
    let features = derive_feature_availability(&env);
    let flags = FeatureFlags::resolve(&env, &EXAM_CONFIG.targets);
    let active = build_active_configuration(AppIdentity::new(env.app_url.clone()), profile);

    let config = Configuration {
        env,
        features,
        flags,
        active,
        exam: &EXAM_CONFIG,
    };

    if config.env.is_production() && !config.is_environment_ready() {
        return Err(ConfigurationError::ProductionNotReady);
    }

    info!(mode = %config.mode(), "configuration loaded for {} environment", config.mode());
    if config.env.is_development() {
        debug!(
            available = ?config.features.enabled_names(),
            flags = ?config.flags.enabled_flags(),
            "development mode: available features"
        );
    }

    Ok(config)
}

/// Lifecycle of a [`Resolver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverState {
    Uninitialized,
    Resolving,
    Resolved,
    Failed,
}

/// Resolves configuration exactly once.
///
/// `Resolved` and `Failed` are terminal: the loader never runs again and
/// the stored outcome is returned to every caller.
#[derive(Debug)]
pub struct Resolver {
    started: AtomicBool,
    outcome: OnceLock<Result<Arc<Configuration>, ConfigurationError>>,
}

impl Resolver {
    pub const fn new() -> Self {
        Self {
            started: AtomicBool::new(false),
            outcome: OnceLock::new(),
        }
    }

    /// Resolve using `load` to obtain the raw environment, unless an
    /// outcome is already stored.
    pub fn resolve<F>(&self, load: F) -> Result<Arc<Configuration>, ConfigurationError>
    where
        F: FnOnce() -> Result<RawEnvironment, ConfigurationError>,
    {
        self.outcome
            .get_or_init(|| {
                let _resolving = ResolvingGuard::enter(&self.started);
                let outcome = load().and_then(|raw| initialize(&raw)).map(Arc::new);
                if let Err(err) = &outcome {
                    error!(error = %err, "configuration resolution failed");
                }
                outcome
            })
            .clone()
    }

    /// Resolve from the process environment.
    pub fn resolve_from_env(&self) -> Result<Arc<Configuration>, ConfigurationError> {
        self.resolve(|| Ok(RawEnvironment::from_env()))
    }

    /// The stored outcome, if resolution has finished.
    pub fn get(&self) -> Option<Result<Arc<Configuration>, ConfigurationError>> {
        self.outcome.get().cloned()
    }

    pub fn state(&self) -> ResolverState {
        match self.outcome.get() {
            Some(Ok(_)) => ResolverState::Resolved,
            Some(Err(_)) => ResolverState::Failed,
            None if self.started.load(Ordering::Acquire) => ResolverState::Resolving,
            None => ResolverState::Uninitialized,
        }
    }
}

/// Marks a resolver as resolving. A loader that panics leaves no outcome
/// behind, so the mark is cleared again and the resolver stays
/// `Uninitialized`.
struct ResolvingGuard<'a>(&'a AtomicBool);

impl<'a> ResolvingGuard<'a> {
    fn enter(started: &'a AtomicBool) -> Self {
        started.store(true, Ordering::Release);
        Self(started)
    }
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.store(false, Ordering::Release);
        }
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

static GLOBAL: Resolver = Resolver::new();

/// The process-wide resolver.
pub fn global() -> &'static Resolver {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::RateTier;
    use std::cell::Cell;
    use std::panic::AssertUnwindSafe;

    fn production_raw() -> RawEnvironment {
        RawEnvironment::new()
            .with("NODE_ENV", "production")
            .with("NEXT_PUBLIC_APP_URL", "https://x.test")
            .with("DATABASE_URL", "postgres://user:pass@db/writingcoach")
            .with("NEXTAUTH_URL", "https://x.test")
            .with("NEXTAUTH_SECRET", "a".repeat(32))
            .with("OPENAI_API_KEY", "sk-abc")
    }

    #[test]
    fn production_end_to_end() {
        let config = initialize(&production_raw()).unwrap();
        assert!(config.is_environment_ready());
        assert_eq!(config.mode(), Mode::Production);

        let profile = config.active.profile;
        assert!(profile.rate_limiting_enabled());
        let limits = profile.rate_limiting.unwrap();
        assert_eq!(limits.tiers.len(), 3);
        assert!(limits.tier(RateTier::Premium).is_some());
        assert_eq!(config.active.identity.url, "https://x.test");
    }

    #[test]
    fn feature_lookup_is_closed() {
        let config = initialize(&production_raw()).unwrap();
        assert_eq!(config.is_feature_enabled("evaluation"), Ok(true));
        assert_eq!(config.is_feature_enabled("monitoring"), Ok(false));
        assert_eq!(
            config.is_feature_enabled("darkMode"),
            Err(UnknownFeatureError("darkMode".into()))
        );
    }

    #[test]
    fn exam_lookup_through_configuration() {
        let config = initialize(&production_raw()).unwrap();
        assert_eq!(config.exam_scoring_config("dsh").unwrap().criteria, 3);
        assert!(config.exam_scoring_config("ielts").is_err());
    }

    #[test]
    fn missing_development_keys_only_in_development() {
        let raw = RawEnvironment::new().with("NODE_ENV", "development");
        assert_eq!(missing_development_keys(&raw), DEVELOPMENT_KEYS.to_vec());

        let raw = RawEnvironment::new()
            .with("NODE_ENV", "development")
            .with("OPENAI_API_KEY", "sk-abc");
        assert_eq!(
            missing_development_keys(&raw),
            vec![EnvVar::DatabaseUrl, EnvVar::NextauthSecret]
        );

        for mode in ["production", "test", "staging"] {
            let raw = RawEnvironment::new().with("NODE_ENV", mode);
            assert!(missing_development_keys(&raw).is_empty(), "{mode}");
        }
        assert!(missing_development_keys(&RawEnvironment::new()).is_empty());
    }

    #[test]
    fn initialize_fails_atomically() {
        let raw = production_raw().without("DATABASE_URL");
        let err = initialize(&raw).unwrap_err();
        assert!(err.mentions("DATABASE_URL"));
    }

    #[test]
    fn resolver_runs_loader_once() {
        let resolver = Resolver::new();
        assert_eq!(resolver.state(), ResolverState::Uninitialized);
        assert!(resolver.get().is_none());

        let calls = Cell::new(0);
        let first = resolver
            .resolve(|| {
                calls.set(calls.get() + 1);
                Ok(production_raw())
            })
            .unwrap();
        let second = resolver
            .resolve(|| {
                calls.set(calls.get() + 1);
                Ok(RawEnvironment::new())
            })
            .unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(resolver.state(), ResolverState::Resolved);
    }

    #[test]
    fn failed_resolver_reraises_same_error() {
        let resolver = Resolver::new();
        let first = resolver
            .resolve(|| Ok(production_raw().without("OPENAI_API_KEY")))
            .unwrap_err();
        assert_eq!(resolver.state(), ResolverState::Failed);

        let second = resolver.resolve(|| Ok(production_raw())).unwrap_err();
        assert_eq!(first, second);
        assert_eq!(resolver.get(), Some(Err(first)));
    }

    #[test]
    fn panicking_loader_leaves_resolver_uninitialized() {
        let resolver = Resolver::new();
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let _ = resolver.resolve(|| panic!("loader failed"));
        }));
        assert!(result.is_err());
        assert_eq!(resolver.state(), ResolverState::Uninitialized);
        assert!(resolver.get().is_none());

        assert!(resolver.resolve(|| Ok(production_raw())).is_ok());
        assert_eq!(resolver.state(), ResolverState::Resolved);
    }

    #[cfg(unix)]
    #[test]
    fn resolve_from_env_reports_every_violation() {
        use crate::env::process_env;
        use std::ffi::OsString;

        let vars = [
            ("NODE_ENV", OsString::from("production")),
            ("NEXT_PUBLIC_APP_URL", OsString::from("https://x.test")),
            ("NEXTAUTH_URL", OsString::from("https://x.test")),
            ("NEXTAUTH_SECRET", OsString::from("short")),
            ("OPENAI_API_KEY", OsString::from("sk-abc")),
            ("POSTHOG_HOST", process_env::non_utf8()),
        ];
        let resolver = Resolver::new();
        let err = process_env::with_vars(&vars, || resolver.resolve_from_env()).unwrap_err();

        let fields: Vec<&str> = err.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["DATABASE_URL", "NEXTAUTH_SECRET", "POSTHOG_HOST"]);
        assert_eq!(resolver.state(), ResolverState::Failed);
    }

    #[test]
    fn global_resolver_is_shared() {
        use crate::env::process_env;
        use std::ffi::OsString;

        assert!(std::ptr::eq(global(), global()));

        let vars: Vec<(&str, OsString)> = [
            ("NODE_ENV", "test".to_string()),
            ("NEXT_PUBLIC_APP_URL", "https://x.test".to_string()),
            ("DATABASE_URL", "postgres://db".to_string()),
            ("NEXTAUTH_URL", "https://x.test".to_string()),
            ("NEXTAUTH_SECRET", "a".repeat(32)),
            ("OPENAI_API_KEY", "sk-abc".to_string()),
        ]
        .into_iter()
        .map(|(key, value)| (key, OsString::from(value)))
        .collect();

        let first = process_env::with_vars(&vars, || global().resolve_from_env()).unwrap();
        let second = global().resolve(|| Ok(RawEnvironment::new())).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.mode(), Mode::Test);
        assert_eq!(global().state(), ResolverState::Resolved);
    }

    #[test]
    fn loader_error_is_stored() {
        let resolver = Resolver::new();
        let err = ConfigurationError::Invalid(vec![crate::Violation::new(
            "NODE_ENV",
            crate::schema::INVALID_UTF8,
        )]);
        let returned = resolver.resolve(|| Err(err.clone())).unwrap_err();
        assert_eq!(returned, err);
        assert_eq!(resolver.state(), ResolverState::Failed);
    }
}
