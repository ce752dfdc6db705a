//! Operating mode of the process.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The mode selected by `NODE_ENV`. Sole selector for the active profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Development,
    Production,
    Test,
}

impl Mode {
    /// Every recognized mode, in declaration order.
    pub const ALL: [Mode; 3] = [Mode::Development, Mode::Production, Mode::Test];

    /// Canonical string value.
    pub const fn as_str(self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
            Mode::Test => "test",
        }
    }

    /// Parse an exact mode string. No case folding or trimming.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.as_str() == value)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_exact() {
        assert_eq!(Mode::parse("production"), Some(Mode::Production));
        assert_eq!(Mode::parse("test"), Some(Mode::Test));
        assert_eq!(Mode::parse("Production"), None);
        assert_eq!(Mode::parse(" development"), None);
        assert_eq!(Mode::parse("staging"), None);
    }

    #[test]
    fn display_matches_as_str() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string(), mode.as_str());
        }
    }
}
