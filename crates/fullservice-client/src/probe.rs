//! Network status probe.

use async_trait::async_trait;
use tracing::{debug, error};

use crate::client::RpcClient;
use crate::error::ProbeError;
use crate::types::{GET_NETWORK_STATUS, JsonRpcRequest, NetworkStatusResult};

/// Source of the current network block height.
#[async_trait]
pub trait BlockHeightSource: Send + Sync {
    /// Fetch the block height once.
    async fn fetch_block_height(&self) -> Result<f64, ProbeError>;

    /// Get the name of this source
    fn name(&self) -> &str {
        "block_height"
    }
}

/// Block height probe backed by full-service `get_network_status`.
#[derive(Debug, Clone)]
pub struct StatusProbe {
    client: RpcClient,
}

impl StatusProbe {
    /// Request id sent with every status call.
    pub const REQUEST_ID: u64 = 1;

    /// Create a probe using `client`.
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// Underlying RPC client.
    pub fn client(&self) -> &RpcClient {
        &self.client
    }

    /// Build the `get_network_status` request.
    pub fn request() -> JsonRpcRequest {
        JsonRpcRequest::new(Self::REQUEST_ID, GET_NETWORK_STATUS)
    }
}

#[async_trait]
impl BlockHeightSource for StatusProbe {
    async fn fetch_block_height(&self) -> Result<f64, ProbeError> {
        let response = self
            .client
            .call::<_, NetworkStatusResult>(&Self::request())
            .await?;

        if let Some(err) = response.error {
            error!(code = err.code, message = %err.message, "full-service returned an error");
            return Err(ProbeError::Remote {
                code: err.code,
                message: err.message,
            });
        }

        let result = response.result.ok_or(ProbeError::MissingResult)?;
        let height = parse_block_height(&result.network_status.network_block_height)?;
        debug!(height, "Fetched network block height");
        Ok(height)
    }

    fn name(&self) -> &str {
        GET_NETWORK_STATUS
    }
}

/// Convert a decimal height string to `f64`.
///
/// Non-numeric and non-finite values are rejected.
pub fn parse_block_height(value: &str) -> Result<f64, ProbeError> {
    let height = value.parse::<f64>().map_err(|source| {
        error!(value, error = %source, "Unable to parse block height");
        ProbeError::Parse {
            value: value.to_string(),
            source,
        }
    })?;

    if !height.is_finite() {
        error!(value, "Block height is not a finite number");
        return Err(ProbeError::NonFinite(value.to_string()));
    }

    Ok(height)
}
