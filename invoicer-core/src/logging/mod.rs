//! Logging setup
//!
//! Everything logs through the `log` macros. The binary installs an
//! `env_logger` backend once at startup from the `[logging]` section:
//!
//! ```rust,no_run
//! use invoicer_core::config::LoggingConfig;
//!
//! invoicer_core::logging::init_logging(&LoggingConfig::default())?;
//! log::info!("Server starting on port {}", 3000);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod formatter;

pub use formatter::{LogEntry, LogFormat};

use crate::config::LoggingConfig;
use anyhow::Context;
use std::io::Write;

/// Target used for per-request access lines
pub const ACCESS_TARGET: &str = "invoicer::access";

/// Install the global logger
///
/// Fails if a logger is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    build_logger(config)?.try_init().context("Failed to install logger")
}

/// Build the configured logger without installing it
pub fn build_logger(config: &LoggingConfig) -> anyhow::Result<env_logger::Builder> {
    let format: LogFormat = config.format.parse()?;

    let mut builder = env_logger::Builder::new();
    builder.parse_filters(&config.level);
    builder.format(move |buf, record| {
        writeln!(buf, "{}", format.format_entry(&LogEntry::from_record(record)))
    });

    Ok(builder)
}

/// Log one access line for a finished request
pub fn log_access(method: &str, path: &str, status: u16, started: std::time::Instant) {
    log::info!(
        target: ACCESS_TARGET,
        "{} {} {} {}ms",
        method,
        path,
        status,
        started.elapsed().as_millis()
    );
}
