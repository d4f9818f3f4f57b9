//! Common error types for the block height exporter.

use std::fmt;

/// A specialized Result type for exporter operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Process-level error type.
///
/// Component crates carry their own detailed error enums; this type is what
/// reaches `main` and decides the exit status.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Probe error: {0}")]
    Probe(String),

    #[error("Metrics server error: {0}")]
    Metrics(String),

    #[error("Logging error: {0}")]
    Logging(String),

    #[error("Unknown error: {0}")]
    Other(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl fmt::Display) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new probe error.
    pub fn probe(msg: impl fmt::Display) -> Self {
        Error::Probe(msg.to_string())
    }

    /// Create a new metrics server error.
    pub fn metrics(msg: impl fmt::Display) -> Self {
        Error::Metrics(msg.to_string())
    }

    /// Create a new logging error.
    pub fn logging(msg: impl fmt::Display) -> Self {
        Error::Logging(msg.to_string())
    }

    /// Create a new other error.
    pub fn other(msg: impl fmt::Display) -> Self {
        Error::Other(msg.to_string())
    }
}
