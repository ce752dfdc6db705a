//! WritingCoach startup bootstrap.
//!
//! Loads `.env`, sets up logging from the active profile, resolves the
//! configuration once and reports what the process is going to run with.

pub mod error;
pub mod report;
pub mod telemetry;

pub use error::BootstrapError;
pub use report::StartupReport;
