//! # WritingCoach Config
//!
//! Environment validation and tiered configuration for the WritingCoach C1
//! exam writing coach.
//!
//! The crate does two things, once, at process start:
//!
//! 1. **Validate** the process environment against a fixed schema. Every
//!    violated constraint is collected; validation either succeeds
//!    completely or fails with one [`ConfigurationError`] listing them all.
//! 2. **Resolve** the configuration: pick the static profile for the mode,
//!    merge it with the app identity, and derive feature availability and
//!    feature flags from the credentials that are present.
//!
//! ## Design Principles
//!
//! - **No hidden side effects**: nothing runs at load time; the bootstrap
//!   calls [`initialize`] or [`Resolver::resolve`] explicitly
//! - **All or nothing**: no partial environment or configuration is published
//! - **Read-only**: profiles and exam data are `static` items; resolved
//!   configuration is shared behind `Arc` and has no mutating API
//! - **Closed lookups**: unknown flag names and exam types are errors, never
//!   silent defaults
//!
//! ## Quick Start
//!
//! ```rust
//! use writingcoach_config::{initialize, get_exam_scoring_config, RawEnvironment};
//!
//! let raw = RawEnvironment::new()
//!     .with("NODE_ENV", "production")
//!     .with("NEXT_PUBLIC_APP_URL", "https://x.test")
//!     .with("DATABASE_URL", "postgres://db/writingcoach")
//!     .with("NEXTAUTH_URL", "https://x.test")
//!     .with("NEXTAUTH_SECRET", "a".repeat(32))
//!     .with("OPENAI_API_KEY", "sk-abc");
//!
//! let config = initialize(&raw).unwrap();
//! assert!(config.is_environment_ready());
//! assert!(config.active.profile.rate_limiting_enabled());
//! assert_eq!(config.is_feature_enabled("evaluation"), Ok(true));
//!
//! let scoring = get_exam_scoring_config("testdaf").unwrap();
//! assert_eq!(scoring.passing_level(), Some("TDN_4"));
//! ```

pub mod app;
pub mod env;
pub mod error;
pub mod exam;
pub mod features;
pub mod flags;
pub mod mode;
pub mod profile;
pub mod resolver;
pub mod schema;

// Re-export main types at crate root
pub use app::{build_active_configuration, ActiveConfiguration, AppIdentity};
pub use env::{validate_environment, EnvVar, RawEnvironment, ValidatedEnvironment};
pub use error::{
    ConfigurationError, Error, Result, UnknownExamTypeError, UnknownFeatureError, Violation,
};
pub use exam::{
    get_exam_scoring_config, get_time_limit, get_word_count, ExamDomainConfig, ExamType,
    ScoringConfig, WordCount, WordRange, EXAM_CONFIG,
};
pub use features::{derive_feature_availability, FeatureAvailability};
pub use flags::{FeatureFlag, FeatureFlags};
pub use mode::Mode;
pub use profile::{resolve_active_profile, ConfigurationProfile};
pub use resolver::{
    global, initialize, is_environment_ready, Configuration, Resolver, ResolverState,
};
