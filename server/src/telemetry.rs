//! Tracing subscriber setup driven by the profile's logging settings.

use crate::error::{BootstrapError, Result};
use tracing_subscriber::EnvFilter;
use writingcoach_config::profile::{LogLevel, LoggingSettings};

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(level: LogLevel) -> String {
    format!(
        "writingcoach_server={level},writingcoach_config={level},warn",
        level = level.as_str()
    )
}

/// `RUST_LOG` wins over the profile level.
pub fn env_filter(logging: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(logging.level)))
}

/// Install the global subscriber: JSON lines for structured profiles,
/// human-readable output otherwise.
pub fn init(logging: &LoggingSettings) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging))
        .with_writer(std::io::stderr);

    let installed = if logging.structured_logs {
        builder.json().try_init()
    } else if logging.pretty_print {
        builder.pretty().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| BootstrapError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use writingcoach_config::profile::{DEVELOPMENT, PRODUCTION};

    #[test]
    fn directive_uses_profile_level() {
        assert_eq!(
            default_directive(DEVELOPMENT.logging.level),
            "writingcoach_server=debug,writingcoach_config=debug,warn"
        );
        assert_eq!(
            default_directive(PRODUCTION.logging.level),
            "writingcoach_server=info,writingcoach_config=info,warn"
        );
    }

    #[test]
    fn second_init_fails() {
        let _ = init(&PRODUCTION.logging);
        let err = init(&PRODUCTION.logging).unwrap_err();
        assert!(matches!(err, BootstrapError::Telemetry(_)));
    }
}
