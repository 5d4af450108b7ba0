//! Logging System
//!
//! Structured logging using the `tracing` crate. Logs always go to stderr so that
//! stdout carries only command output. Level and format come from CLI flags, then
//! the `SLCLI_LOG` / `SLCLI_LOG_FORMAT` environment variables, then defaults.

use crate::error::CliError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "SLCLI_LOG";
/// Environment variable selecting `text` or `json` log lines.
pub const LOG_FORMAT_ENV: &str = "SLCLI_LOG_FORMAT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Enable colored output (text format only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            color: default_true(),
        }
    }
}

/// Map a `-v` count onto a level; zero keeps the default.
pub fn level_for_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Initialize the logging system.
///
/// Calling it twice is harmless; the second subscriber is rejected and ignored.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), CliError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let use_color = config.map(|c| c.color).unwrap_or(true);

    let base_subscriber = Registry::default().with(filter);

    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        tracing::debug!("logging already initialized: {}", e);
    }
    Ok(())
}

/// Build environment filter. A level other than the default came from a flag and
/// wins over `SLCLI_LOG`.
fn build_env_filter(config: Option<&LoggingConfig>) -> Result<EnvFilter, CliError> {
    let level = config.map(|c| c.level.as_str()).unwrap_or("warn");
    if level == default_log_level() {
        if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
            return Ok(filter);
        }
    }

    match level {
        "trace" | "debug" | "info" | "warn" | "error" | "off" => Ok(EnvFilter::new(level)),
        other => Err(CliError::Config(format!(
            "Invalid log level: {} (must be trace, debug, info, warn, error or off)",
            other
        ))),
    }
}

/// Determine output format; a non-default config value wins over `SLCLI_LOG_FORMAT`.
fn determine_format(config: Option<&LoggingConfig>) -> Result<String, CliError> {
    let format = config.map(|c| c.format.as_str()).unwrap_or("text");
    if format == default_format() {
        if let Ok(env_format) = std::env::var(LOG_FORMAT_ENV) {
            if env_format == "json" || env_format == "text" {
                return Ok(env_format);
            }
        }
    }

    if format != "json" && format != "text" {
        return Err(CliError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        )));
    }
    Ok(format.to_string())
}
