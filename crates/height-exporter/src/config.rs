//! Environment-sourced configuration for the exporter

use common::LogFormat;
use std::collections::HashMap;
use std::env::VarError;
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use validator::{Validate, ValidationError};

pub const LISTEN_HOST: &str = "LISTEN_HOST";
pub const LISTEN_PORT: &str = "LISTEN_PORT";
pub const CHECK_WAIT: &str = "CHECK_WAIT";
pub const TIMEOUT: &str = "TIMEOUT";
pub const NUM_OF_NODES: &str = "NUM_OF_NODES";
pub const FULL_SERVICE_URL: &str = "FULL_SERVICE_URL";
pub const MC_NETWORK: &str = "MC_NETWORK";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Every variable the exporter reads
pub const ALL_VARS: [&str; 9] = [
    LISTEN_HOST,
    LISTEN_PORT,
    CHECK_WAIT,
    TIMEOUT,
    NUM_OF_NODES,
    FULL_SERVICE_URL,
    MC_NETWORK,
    LOG_LEVEL,
    LOG_FORMAT,
];

pub const DEFAULT_LISTEN_HOST: &str = "127.0.0.1";
pub const DEFAULT_LISTEN_PORT: u16 = 9090;
pub const DEFAULT_CHECK_WAIT_SECS: u64 = 30;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_NUM_OF_NODES: u64 = 10;
pub const DEFAULT_FULL_SERVICE_URL: &str = "https://readonly-fs-mainnet.mobilecoin.com/wallet/v2";
pub const DEFAULT_MC_NETWORK: &str = "main";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to parse {key}={value:?}: {source}")]
    InvalidInteger {
        key: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },

    #[error("Invalid {key}: {message}")]
    InvalidValue { key: &'static str, message: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Exporter configuration, loaded once at startup.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct Config {
    #[validate(length(min = 1))]
    pub listen_host: String,

    pub listen_port: u16,

    /// Pause between probe cycles
    #[validate(custom = "validate_seconds")]
    pub check_wait: Duration,

    /// Time budget for one probe
    #[validate(custom = "validate_seconds")]
    pub timeout: Duration,

    /// Number of nodes in the network. Parsed but not used by the probe.
    pub num_of_nodes: u64,

    #[validate(url)]
    pub full_service_url: String,

    /// Value of the `network` label
    #[validate(length(min = 1))]
    pub mc_network: String,

    pub log_level: LevelFilter,

    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_host: DEFAULT_LISTEN_HOST.to_string(),
            listen_port: DEFAULT_LISTEN_PORT,
            check_wait: Duration::from_secs(DEFAULT_CHECK_WAIT_SECS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            num_of_nodes: DEFAULT_NUM_OF_NODES,
            full_service_url: DEFAULT_FULL_SERVICE_URL.to_string(),
            mc_network: DEFAULT_MC_NETWORK.to_string(),
            log_level: LevelFilter::INFO,
            log_format: LogFormat::Json,
        }
    }
}

fn validate_seconds(value: &Duration) -> Result<(), ValidationError> {
    if value.is_zero() {
        return Err(ValidationError::new("duration_zero"));
    }
    Ok(())
}

/// Interpret the result of reading `key` from the environment.
///
/// Unset is `None`; a value that is not valid unicode is an error.
fn env_value(key: &'static str, value: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidValue {
            key,
            message: format!("value {:?} is not valid unicode", raw),
        }),
    }
}

fn parse_int<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|source| ConfigError::InvalidInteger {
                key,
                value: raw,
                source,
            }),
        None => Ok(default),
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut env = HashMap::new();
        for key in ALL_VARS {
            if let Some(value) = env_value(key, std::env::var(key))? {
                env.insert(key, value);
            }
        }
        Self::from_lookup(|key| env.get(key).cloned())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Unset variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_host = lookup(LISTEN_HOST).unwrap_or_else(|| DEFAULT_LISTEN_HOST.to_string());
        let listen_port = parse_int(LISTEN_PORT, lookup(LISTEN_PORT), DEFAULT_LISTEN_PORT)?;
        let check_wait = parse_int(CHECK_WAIT, lookup(CHECK_WAIT), DEFAULT_CHECK_WAIT_SECS)?;
        let timeout = parse_int(TIMEOUT, lookup(TIMEOUT), DEFAULT_TIMEOUT_SECS)?;
        let num_of_nodes = parse_int(NUM_OF_NODES, lookup(NUM_OF_NODES), DEFAULT_NUM_OF_NODES)?;

        let log_level = match lookup(LOG_LEVEL) {
            Some(raw) => common::logging::parse_level(&raw).map_err(|e| {
                ConfigError::InvalidValue {
                    key: LOG_LEVEL,
                    message: e.to_string(),
                }
            })?,
            None => LevelFilter::INFO,
        };

        let log_format = match lookup(LOG_FORMAT) {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| ConfigError::InvalidValue {
                key: LOG_FORMAT,
                message: e.to_string(),
            })?,
            None => LogFormat::Json,
        };

        let config = Self {
            listen_host,
            listen_port,
            check_wait: Duration::from_secs(check_wait),
            timeout: Duration::from_secs(timeout),
            num_of_nodes,
            full_service_url: lookup(FULL_SERVICE_URL)
                .unwrap_or_else(|| DEFAULT_FULL_SERVICE_URL.to_string()),
            mc_network: lookup(MC_NETWORK).unwrap_or_else(|| DEFAULT_MC_NETWORK.to_string()),
            log_level,
            log_format,
        };

        config.validate()?;
        Ok(config)
    }

    /// Address the metrics server binds to
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.listen_host, self.listen_port)
    }
}
