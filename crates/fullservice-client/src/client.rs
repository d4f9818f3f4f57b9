//! HTTP transport for full-service JSON-RPC calls.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::RpcError;
use crate::types::{JsonRpcRequest, JsonRpcResponse};

/// JSON-RPC client bound to one full-service endpoint.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl RpcClient {
    /// Create a client posting to `url`.
    ///
    /// `timeout` bounds each request from connect to the end of the body.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RpcError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RpcError::Build)?;

        Ok(Self {
            url: url.into(),
            client,
            timeout,
        })
    }

    /// Endpoint this client posts to.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Post `request` and decode the reply into `R`.
    ///
    /// A non-2xx status is reported without looking at the body. Nothing
    /// is retried here.
    pub async fn call<P, R>(&self, request: &JsonRpcRequest<P>) -> Result<JsonRpcResponse<R>, RpcError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let payload = serde_json::to_vec(request).map_err(RpcError::Encode)?;
        debug!(
            method = %request.method,
            payload = %String::from_utf8_lossy(&payload),
            "Request payload"
        );

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|source| {
                error!(url = %self.url, error = %source, "Post failed");
                RpcError::Transport {
                    url: self.url.clone(),
                    source,
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(url = %self.url, status = status.as_u16(), "HTTP response error");
            return Err(RpcError::Status(status));
        }

        let body = response.bytes().await.map_err(|e| {
            error!(url = %self.url, error = %e, "Unable to read response body");
            RpcError::Body(e)
        })?;
        debug!(body = %String::from_utf8_lossy(&body), "Response body");

        serde_json::from_slice(&body).map_err(|e| {
            error!(url = %self.url, error = %e, "Unable to decode full-service response");
            RpcError::Decode(e)
        })
    }
}
