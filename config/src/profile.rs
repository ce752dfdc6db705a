//! Static configuration profiles, one per mode.
//!
//! Profiles are `static` items: they are built at compile time and can only
//! be borrowed, never mutated.

use crate::Mode;
use serde::Serialize;

/// Connection pool bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolBounds {
    pub min: u32,
    pub max: u32,
}

/// Persistence tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    /// Log every query
    pub logging: bool,
    pub pool: PoolBounds,
    /// Require TLS to the database
    pub ssl: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_timeout_ms: Option<u64>,
}

/// OpenAI call tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenAiSettings {
    pub model: &'static str,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub enable_caching: bool,
}

/// Anthropic call tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnthropicSettings {
    pub model: &'static str,
    pub max_tokens: u32,
    pub enable_caching: bool,
}

/// AI provider settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AiSettings {
    /// Replace provider calls with canned responses
    pub mock: bool,
    pub openai: OpenAiSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<AnthropicSettings>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCacheSettings {
    pub enabled: bool,
    pub ttl_secs: u64,
}

/// Response caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSettings {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_cache: Option<PromptCacheSettings>,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub const fn as_str(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log verbosity and structuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub pretty_print: bool,
    pub log_requests: bool,
    /// Emit machine-readable JSON lines
    pub structured_logs: bool,
}

/// Request quota over a rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateQuota {
    pub requests: u32,
    pub window_ms: u64,
}

/// Customer tier a quota applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RateTier {
    Free,
    Paid,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierQuota {
    pub tier: RateTier,
    #[serde(flatten)]
    pub quota: RateQuota,
}

/// Request rate limiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// Flat quota applied to every caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota: Option<RateQuota>,
    /// Per-tier quotas
    pub tiers: &'static [TierQuota],
}

impl RateLimitSettings {
    pub fn tier(&self, tier: RateTier) -> Option<&RateQuota> {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| &t.quota)
    }
}

/// Behavioral toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorToggles {
    pub skip_email_verification: bool,
    pub allow_test_accounts: bool,
    pub mock_payments: bool,
    /// Expose error details to clients
    pub detailed_errors: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsSettings {
    /// Allow the application URL as origin
    pub allow_app_origin: bool,
    pub credentials: bool,
}

/// HTTP hardening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecuritySettings {
    /// Security response headers
    pub helmet: bool,
    pub cors: CorsSettings,
    pub rate_limit: bool,
    pub csrf: bool,
}

/// A complete bundle of tuning values for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationProfile {
    #[serde(skip)]
    pub mode: Mode,
    pub database: DatabaseSettings,
    pub ai: AiSettings,
    pub cache: CacheSettings,
    pub logging: LoggingSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limiting: Option<RateLimitSettings>,
    pub features: BehaviorToggles,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecuritySettings>,
}

impl ConfigurationProfile {
    pub fn rate_limiting_enabled(&self) -> bool {
        self.rate_limiting.is_some_and(|r| r.enabled)
    }
}

const HOUR_MS: u64 = 60 * 60 * 1000;
const GPT_4O: &str = "gpt-4o";
const CLAUDE_HAIKU: &str = "claude-3-haiku-20240307";

pub static DEVELOPMENT: ConfigurationProfile = ConfigurationProfile {
    mode: Mode::Development,
    database: DatabaseSettings {
        logging: true,
        pool: PoolBounds { min: 1, max: 5 },
        ssl: false,
        connection_timeout_ms: None,
    },
    ai: AiSettings {
        mock: false,
        openai: OpenAiSettings {
            model: GPT_4O,
            max_tokens: 2000,
            max_retries: Some(3),
            timeout_ms: Some(30_000),
            temperature: Some(0.3),
            enable_caching: false,
        },
        anthropic: Some(AnthropicSettings {
            model: CLAUDE_HAIKU,
            max_tokens: 1000,
            enable_caching: false,
        }),
    },
    cache: CacheSettings {
        enabled: false,
        ttl_secs: Some(60),
        prompt_cache: None,
    },
    logging: LoggingSettings {
        level: LogLevel::Debug,
        pretty_print: true,
        log_requests: true,
        structured_logs: false,
    },
    rate_limiting: Some(RateLimitSettings {
        enabled: false,
        quota: Some(RateQuota {
            requests: 1000,
            window_ms: 60 * 1000,
        }),
        tiers: &[],
    }),
    features: BehaviorToggles {
        skip_email_verification: true,
        allow_test_accounts: true,
        mock_payments: true,
        detailed_errors: true,
    },
    security: None,
};

pub static PRODUCTION: ConfigurationProfile = ConfigurationProfile {
    mode: Mode::Production,
    database: DatabaseSettings {
        logging: false,
        pool: PoolBounds { min: 5, max: 20 },
        ssl: true,
        connection_timeout_ms: Some(10_000),
    },
    ai: AiSettings {
        mock: false,
        openai: OpenAiSettings {
            model: GPT_4O,
            max_tokens: 2000,
            max_retries: Some(5),
            timeout_ms: Some(45_000),
            temperature: Some(0.3),
            enable_caching: true,
        },
        anthropic: Some(AnthropicSettings {
            model: CLAUDE_HAIKU,
            max_tokens: 1000,
            enable_caching: true,
        }),
    },
    cache: CacheSettings {
        enabled: true,
        ttl_secs: Some(3600),
        prompt_cache: Some(PromptCacheSettings {
            enabled: true,
            ttl_secs: 86_400,
        }),
    },
    logging: LoggingSettings {
        level: LogLevel::Info,
        pretty_print: false,
        log_requests: false,
        structured_logs: true,
    },
    rate_limiting: Some(RateLimitSettings {
        enabled: true,
        quota: None,
        tiers: &[
            TierQuota {
                tier: RateTier::Free,
                quota: RateQuota {
                    requests: 10,
                    window_ms: HOUR_MS,
                },
            },
            TierQuota {
                tier: RateTier::Paid,
                quota: RateQuota {
                    requests: 1000,
                    window_ms: HOUR_MS,
                },
            },
            TierQuota {
                tier: RateTier::Premium,
                quota: RateQuota {
                    requests: 10_000,
                    window_ms: HOUR_MS,
                },
            },
        ],
    }),
    features: BehaviorToggles {
        skip_email_verification: false,
        allow_test_accounts: false,
        mock_payments: false,
        detailed_errors: false,
    },
    security: Some(SecuritySettings {
        helmet: true,
        cors: CorsSettings {
            allow_app_origin: true,
            credentials: true,
        },
        rate_limit: true,
        csrf: true,
    }),
};

pub static TEST: ConfigurationProfile = ConfigurationProfile {
    mode: Mode::Test,
    database: DatabaseSettings {
        logging: false,
        pool: PoolBounds { min: 1, max: 3 },
        ssl: false,
        connection_timeout_ms: None,
    },
    ai: AiSettings {
        mock: true,
        openai: OpenAiSettings {
            // cheaper for tests
            model: "gpt-3.5-turbo",
            max_tokens: 500,
            max_retries: None,
            timeout_ms: None,
            temperature: None,
            enable_caching: false,
        },
        anthropic: None,
    },
    cache: CacheSettings {
        enabled: false,
        ttl_secs: None,
        prompt_cache: None,
    },
    logging: LoggingSettings {
        level: LogLevel::Error,
        pretty_print: false,
        log_requests: false,
        structured_logs: false,
    },
    rate_limiting: None,
    features: BehaviorToggles {
        skip_email_verification: true,
        allow_test_accounts: true,
        mock_payments: true,
        detailed_errors: true,
    },
    security: None,
};

/// Profile for a typed mode.
pub fn profile_for(mode: Mode) -> &'static ConfigurationProfile {
    match mode {
        Mode::Development => &DEVELOPMENT,
        Mode::Production => &PRODUCTION,
        Mode::Test => &TEST,
    }
}

/// Select the profile for a mode string.
///
/// Total: any unrecognized value falls back to the development profile
/// rather than failing.
pub fn resolve_active_profile(mode: &str) -> &'static ConfigurationProfile {
    profile_for(Mode::parse(mode).unwrap_or(Mode::Development))
}
