//! Application identity and the active configuration.

use crate::profile::ConfigurationProfile;
use crate::Mode;
use serde::Serialize;

pub const APP_NAME: &str = "WritingCoach C1";
pub const APP_DESCRIPTION: &str =
    "AI-powered C1 German writing coach for international students";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Static identity of the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppIdentity {
    pub name: &'static str,
    pub description: &'static str,
    pub version: &'static str,
    pub url: String,
}

impl AppIdentity {
    /// Identity for an application served at `url`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            name: APP_NAME,
            description: APP_DESCRIPTION,
            version: APP_VERSION,
            url: url.into(),
        }
    }
}

/// App identity overlaid with the selected profile.
///
/// Serializes as one flat object: identity keys (`name`, `description`,
/// `version`, `url`) next to profile keys (`database`, `ai`, `cache`,
/// `logging`, `rateLimiting`, `features`, `security`). The two key sets are
/// disjoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveConfiguration {
    #[serde(flatten)]
    pub identity: AppIdentity,
    #[serde(flatten)]
    pub profile: &'static ConfigurationProfile,
}

impl ActiveConfiguration {
    pub fn mode(&self) -> Mode {
        self.profile.mode
    }

    /// Origins allowed by CORS, if the profile enables it.
    pub fn cors_origins(&self) -> Vec<&str> {
        match self.profile.security {
            Some(security) if security.cors.allow_app_origin => vec![self.identity.url.as_str()],
            _ => Vec::new(),
        }
    }
}

/// Merge app identity with a profile.
pub fn build_active_configuration(
    identity: AppIdentity,
    profile: &'static ConfigurationProfile,
) -> ActiveConfiguration {
    ActiveConfiguration { identity, profile }
}
