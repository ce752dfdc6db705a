//! Feature availability derived from credential presence.

use crate::{EnvVar, ValidatedEnvironment};
use serde::Serialize;

/// Which optional integrations have the credentials they need.
///
/// Every flag is a pure function of the validated environment. A flag is
/// `true` only when all of its keys are present and non-empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureAvailability {
    pub open_ai: bool,
    pub claude: bool,
    pub ocr: bool,
    pub google_auth: bool,
    pub payments: bool,
    pub sentry: bool,
    pub analytics: bool,
    pub redis: bool,
    pub email: bool,
}

impl FeatureAvailability {
    /// Flags as `(name, enabled)` pairs, in reporting order.
    pub fn entries(&self) -> [(&'static str, bool); 9] {
        [
            ("openAi", self.open_ai),
            ("claude", self.claude),
            ("ocr", self.ocr),
            ("googleAuth", self.google_auth),
            ("payments", self.payments),
            ("sentry", self.sentry),
            ("analytics", self.analytics),
            ("redis", self.redis),
            ("email", self.email),
        ]
    }

    /// Names of the available features.
    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.entries()
            .into_iter()
            .filter(|(_, enabled)| *enabled)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Derive feature availability from the validated environment.
pub fn derive_feature_availability(env: &ValidatedEnvironment) -> FeatureAvailability {
    let all = |keys: &[EnvVar]| keys.iter().all(|key| env.is_present(*key));

    FeatureAvailability {
        open_ai: all(&[EnvVar::OpenaiApiKey]),
        claude: all(&[EnvVar::AnthropicApiKey]),
        ocr: all(&[EnvVar::GoogleCloudKey]),
        google_auth: all(&[EnvVar::GoogleClientId, EnvVar::GoogleClientSecret]),
        payments: all(&[EnvVar::StripeSecretKey, EnvVar::StripePublishableKey]),
        sentry: all(&[EnvVar::SentryDsn]),
        analytics: all(&[EnvVar::PosthogKey]),
        redis: all(&[EnvVar::RedisUrl]),
        email: all(&[EnvVar::ResendApiKey]),
    }
}
