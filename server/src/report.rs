//! Startup summary printed once configuration is resolved.
//!
//! The report is built from the resolved [`Configuration`] and never
//! includes credential values: only identity, profile data, readiness and
//! which features and flags are on.

use serde::Serialize;
use std::io::Write;
use writingcoach_config::{ActiveConfiguration, Configuration, ExamType, FeatureFlag, Mode};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupReport<'a> {
    pub mode: Mode,
    pub environment_ready: bool,
    pub rate_limiting: bool,
    pub available_features: Vec<&'static str>,
    pub enabled_flags: Vec<FeatureFlag>,
    pub cors_origins: Vec<&'a str>,
    pub supported_exams: [ExamType; 4],
    pub configuration: &'a ActiveConfiguration,
}

impl<'a> StartupReport<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self {
            mode: config.mode(),
            environment_ready: config.is_environment_ready(),
            rate_limiting: config.active.profile.rate_limiting_enabled(),
            available_features: config.features.enabled_names(),
            enabled_flags: config.flags.enabled_flags(),
            cors_origins: config.active.cors_origins(),
            supported_exams: config.exam.supported_exams,
            configuration: &config.active,
        }
    }

    /// Write the report as one JSON document followed by a newline.
    pub fn write_to<W: Write>(&self, mut out: W, pretty: bool) -> crate::error::Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut out, self)?;
        } else {
            serde_json::to_writer(&mut out, self)?;
        }
        writeln!(out)?;
        Ok(())
    }
}
