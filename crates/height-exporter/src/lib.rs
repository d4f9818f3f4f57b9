//! MobileCoin block height exporter
//!
//! Polls a full-service instance for `get_network_status` and exports the
//! network block height as a Prometheus gauge.
//!
//! # Components
//!
//! - **Prober**: probes on a fixed interval and updates the gauge, resetting
//!   it to zero whenever a probe fails
//! - **MetricsRegistry**: owns the `mc_network_block_height` gauge family
//! - **MetricsServer**: serves `GET /metrics` for scrapers
//! - **ExporterServer**: wires the above together for the binary

pub mod config;
pub mod http_server;
pub mod metrics;
pub mod prober;
pub mod server;

pub use config::{Config, ConfigError};
pub use http_server::MetricsServer;
pub use metrics::MetricsRegistry;
pub use prober::Prober;
pub use server::ExporterServer;
