//! JSON-RPC client for MobileCoin full-service.
//!
//! This crate provides the outbound half of the block height exporter:
//! - Typed JSON-RPC request and response envelopes
//! - An HTTP client that posts a request and decodes the reply
//! - A status probe that turns `get_network_status` into a block height
//!
//! # Example
//!
//! ```no_run
//! use fullservice_client::{BlockHeightSource, RpcClient, StatusProbe};
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = RpcClient::new(
//!     "https://readonly-fs-mainnet.mobilecoin.com/wallet/v2",
//!     Duration::from_secs(10),
//! )?;
//! let probe = StatusProbe::new(client);
//!
//! let height = probe.fetch_block_height().await?;
//! println!("network block height: {height}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod probe;
pub mod types;

pub use client::RpcClient;
pub use error::{ProbeError, RpcError};
pub use probe::{BlockHeightSource, StatusProbe};
pub use types::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, NetworkStatus, NetworkStatusResult,
    JSONRPC_VERSION,
};
