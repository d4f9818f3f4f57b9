//! JSON-RPC wire types for full-service.

use serde::{Deserialize, Serialize};

/// Protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name for the network status call.
pub const GET_NETWORK_STATUS: &str = "get_network_status";

/// JSON-RPC request envelope.
///
/// Fields serialize in wire order `id`, `jsonrpc`, `method`, `params`;
/// `params` is left out entirely when absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest<P = serde_json::Value> {
    pub id: u64,
    pub jsonrpc: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

impl<P> JsonRpcRequest<P> {
    /// Create a request without parameters.
    pub fn new(id: u64, method: impl Into<String>) -> Self {
        Self {
            id,
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params: None,
        }
    }

    /// Attach parameters to the request.
    pub fn with_params(mut self, params: P) -> Self {
        self.params = Some(params);
        self
    }
}

/// JSON-RPC response envelope.
///
/// Every envelope field is optional since full-service omits or nulls
/// them depending on the outcome.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub method: Option<String>,
    pub jsonrpc: Option<String>,
    pub id: Option<u64>,
    pub error: Option<JsonRpcError>,
    pub result: Option<R>,
}

/// Error object carried by a failed JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// `result` payload of `get_network_status`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkStatusResult {
    pub network_status: NetworkStatus,
}

/// Network status as reported by full-service.
///
/// Heights are transported as decimal strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkStatus {
    pub network_block_height: String,
}
