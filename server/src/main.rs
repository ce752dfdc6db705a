//! WritingCoach Server - startup bootstrap.
//!
//! Validates the process environment, resolves the tiered configuration and
//! prints a JSON summary of it. Exits non-zero when the environment is not
//! usable.

use std::io;
use std::process::ExitCode;
use writingcoach_config::{global, resolve_active_profile, EnvVar};
use writingcoach_server::{telemetry, BootstrapError, StartupReport};

fn main() -> ExitCode {
    // Load .env before anything reads the environment
    dotenvy::dotenv().ok();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run() -> Result<(), BootstrapError> {
    // Logging comes up before validation so failures get reported. The
    // profile lookup is total, so an unknown or missing mode still works.
    let mode = std::env::var(EnvVar::NodeEnv.as_str()).unwrap_or_default();
    let logging = resolve_active_profile(&mode).logging;
    telemetry::init(&logging)?;

    let config = global().resolve_from_env()?;

    tracing::info!(
        mode = %config.mode(),
        ready = config.is_environment_ready(),
        features = ?config.features.enabled_names(),
        "WritingCoach configuration resolved"
    );

    StartupReport::new(&config).write_to(io::stdout().lock(), logging.pretty_print)
}
