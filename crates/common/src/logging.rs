//! Logging utilities for the block height exporter.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt as fmt_layer, prelude::*};

use crate::error::{Error, Result};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One JSON object per line.
    #[default]
    Json,
    /// Human readable lines.
    Text,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "text" | "plain" => Ok(LogFormat::Text),
            other => Err(Error::config(format!("unknown log format {other:?}"))),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Json => write!(f, "json"),
            LogFormat::Text => write!(f, "text"),
        }
    }
}

/// Parse a log level name.
///
/// Accepts the logrus level names case-insensitively. `warning` is an alias
/// for `warn`; `fatal` and `panic` map to `error`, the most severe level
/// `tracing` has.
pub fn parse_level(s: &str) -> Result<LevelFilter> {
    match s.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok(LevelFilter::TRACE),
        "debug" => Ok(LevelFilter::DEBUG),
        "info" => Ok(LevelFilter::INFO),
        "warn" | "warning" => Ok(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Ok(LevelFilter::ERROR),
        _ => Err(Error::config(format!("invalid log level {s:?}"))),
    }
}

fn env_filter(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()))
}

/// Initialize tracing with human readable output.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init(level: LevelFilter) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt_layer::layer())
        .with(env_filter(level))
        .try_init()
        .map_err(Error::logging)
}

/// Initialize tracing with JSON formatting.
///
/// `RUST_LOG` overrides `level` when set.
pub fn init_json(level: LevelFilter) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt_layer::layer().json())
        .with(env_filter(level))
        .try_init()
        .map_err(Error::logging)
}

/// Initialize tracing in the requested format.
pub fn init_with_format(format: LogFormat, level: LevelFilter) -> Result<()> {
    match format {
        LogFormat::Json => init_json(level),
        LogFormat::Text => init(level),
    }
}
