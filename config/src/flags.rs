//! Product feature flags.
//!
//! The flag set is closed: [`FeatureFlag`] lists every name that can be
//! queried, and parsing any other name fails with [`UnknownFeatureError`].

use crate::exam::EvaluationTargets;
use crate::profile::LogLevel;
use crate::{UnknownFeatureError, ValidatedEnvironment};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Value shipped in `.env.example` for the OpenAI key.
pub const OPENAI_KEY_PLACEHOLDER: &str = "sk-your-openai-key-here";

/// Value shipped in `.env.example` for the Google Cloud Vision key.
pub const GOOGLE_CLOUD_KEY_PLACEHOLDER: &str = "your-google-cloud-vision-key-here";

/// Names accepted by `is_feature_enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureFlag {
    Evaluation,
    Ocr,
    Payments,
    Analytics,
    Monitoring,
}

impl FeatureFlag {
    pub const ALL: [FeatureFlag; 5] = [
        FeatureFlag::Evaluation,
        FeatureFlag::Ocr,
        FeatureFlag::Payments,
        FeatureFlag::Analytics,
        FeatureFlag::Monitoring,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FeatureFlag::Evaluation => "evaluation",
            FeatureFlag::Ocr => "ocr",
            FeatureFlag::Payments => "payments",
            FeatureFlag::Analytics => "analytics",
            FeatureFlag::Monitoring => "monitoring",
        }
    }
}

impl fmt::Display for FeatureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureFlag {
    type Err = UnknownFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| UnknownFeatureError(s.to_string()))
    }
}

/// AI essay evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationFlag {
    pub enabled: bool,
    pub consistency: f64,
    pub max_processing_time_ms: u64,
}

/// Handwriting OCR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrFlag {
    pub enabled: bool,
    pub supported_formats: &'static [&'static str],
    pub max_file_size_bytes: u64,
}

/// Prices in whole euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceTable {
    pub single: u32,
    /// Per month
    pub training: u32,
    /// Per month
    pub simulation: u32,
    /// Per 14 days
    pub powerpass: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaymentsFlag {
    pub enabled: bool,
    pub tiers: &'static [&'static str],
    pub prices: PriceTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalyticsFlag {
    pub enabled: bool,
    pub events: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringFlag {
    pub enabled: bool,
    pub capture_level: LogLevel,
}

/// The resolved feature-flag table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureFlags {
    pub evaluation: EvaluationFlag,
    pub ocr: OcrFlag,
    pub payments: PaymentsFlag,
    pub analytics: AnalyticsFlag,
    pub monitoring: MonitoringFlag,
}

impl FeatureFlags {
    /// Resolve every flag from the environment and exam targets.
    pub fn resolve(env: &ValidatedEnvironment, targets: &EvaluationTargets) -> Self {
        let production = env.is_production();
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());

        Self {
            evaluation: EvaluationFlag {
                enabled: env.openai_api_key != OPENAI_KEY_PLACEHOLDER,
                consistency: targets.consistency,
                max_processing_time_ms: targets.processing_time_ms,
            },
            ocr: OcrFlag {
                enabled: present(&env.google_cloud_key)
                    && env.google_cloud_key.as_deref() != Some(GOOGLE_CLOUD_KEY_PLACEHOLDER),
                supported_formats: &["jpg", "jpeg", "png", "webp"],
                max_file_size_bytes: 5 * 1024 * 1024,
            },
            payments: PaymentsFlag {
                enabled: env
                    .stripe_secret_key
                    .as_deref()
                    .is_some_and(|key| key.starts_with("sk_")),
                tiers: &["free", "single", "training", "simulation", "powerpass"],
                prices: PriceTable {
                    single: 9,
                    training: 49,
                    simulation: 69,
                    powerpass: 99,
                },
            },
            analytics: AnalyticsFlag {
                enabled: production && present(&env.posthog_key),
                events: &["text_submitted", "evaluation_completed", "user_registered"],
            },
            monitoring: MonitoringFlag {
                enabled: production && present(&env.sentry_dsn),
                capture_level: if production {
                    LogLevel::Error
                } else {
                    LogLevel::Debug
                },
            },
        }
    }

    pub fn is_enabled(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::Evaluation => self.evaluation.enabled,
            FeatureFlag::Ocr => self.ocr.enabled,
            FeatureFlag::Payments => self.payments.enabled,
            FeatureFlag::Analytics => self.analytics.enabled,
            FeatureFlag::Monitoring => self.monitoring.enabled,
        }
    }

    /// Look up a flag by name.
    pub fn is_enabled_by_name(&self, name: &str) -> Result<bool, UnknownFeatureError> {
        let flag: FeatureFlag = name.parse()?;
        Ok(self.is_enabled(flag))
    }

    pub fn enabled_flags(&self) -> Vec<FeatureFlag> {
        FeatureFlag::ALL
            .into_iter()
            .filter(|flag| self.is_enabled(*flag))
            .collect()
    }
}
