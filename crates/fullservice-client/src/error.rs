//! Error types for full-service calls.

use std::num::ParseFloatError;
use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by a single JSON-RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("failed to encode request payload: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("HTTP POST {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("full-service returned HTTP status {0}")]
    Status(StatusCode),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("failed to decode full-service response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("call did not complete within {0:?}")]
    Timeout(Duration),
}

impl RpcError {
    /// Whether the error comes from a programming or configuration mistake
    /// rather than from the remote side.
    pub fn is_fatal(&self) -> bool {
        matches!(self, RpcError::Build(_) | RpcError::Encode(_))
    }

    /// Short stable tag for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::Build(_) => "build",
            RpcError::Encode(_) => "encode",
            RpcError::Transport { .. } => "transport",
            RpcError::Status(_) => "status",
            RpcError::Body(_) => "body",
            RpcError::Decode(_) => "decode",
            RpcError::Timeout(_) => "timeout",
        }
    }
}

/// Errors produced while fetching the block height.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error("full-service returned error {code}: {message}")]
    Remote { code: i64, message: String },

    #[error("full-service response has no result")]
    MissingResult,

    #[error("unable to parse block height {value:?}: {source}")]
    Parse {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("block height {0:?} is not a finite number")]
    NonFinite(String),
}

impl ProbeError {
    /// Whether the prober must stop instead of retrying.
    pub fn is_fatal(&self) -> bool {
        match self {
            ProbeError::Rpc(e) => e.is_fatal(),
            _ => false,
        }
    }

    /// Short stable tag for logs.
    ///
    /// Conversion failures report `parse`, never a transport kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Rpc(e) => e.kind(),
            ProbeError::Remote { .. } => "remote",
            ProbeError::MissingResult => "missing_result",
            ProbeError::Parse { .. } | ProbeError::NonFinite(_) => "parse",
        }
    }
}
