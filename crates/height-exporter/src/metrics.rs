//! Prometheus metrics for the block height exporter.

use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::family::Family;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;
use std::collections::HashMap;
use std::sync::atomic::AtomicU64;
use std::sync::{PoisonError, RwLock, RwLockReadGuard};

/// Metric namespace
pub const NAMESPACE: &str = "mc";
/// Metric subsystem
pub const SUBSYSTEM: &str = "network";
/// Gauge name inside the subsystem
pub const BLOCK_HEIGHT: &str = "block_height";

/// Floating point gauge; the value is kept as raw bits in an `AtomicU64`.
pub type FloatGauge = Gauge<f64, AtomicU64>;

/// Labels for per-network metrics
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct NetworkLabels {
    /// Network name (main, test, ...)
    pub network: String,
}

impl NetworkLabels {
    fn new(network: &str) -> Self {
        Self {
            network: network.to_string(),
        }
    }
}

/// Metrics registry holding the block height gauge
///
/// Shared between the prober (writer) and the metrics endpoint (readers).
pub struct MetricsRegistry {
    /// Prometheus registry
    pub registry: Registry,
    /// Latest block height per network
    block_height: Family<NetworkLabels, FloatGauge>,
    /// Handles to the series written so far, keyed by network. Reads go
    /// through here so they never add a series to the family.
    written: RwLock<HashMap<String, FloatGauge>>,
}

impl MetricsRegistry {
    /// Create a new metrics registry
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix(NAMESPACE);

        let block_height = Family::<NetworkLabels, FloatGauge>::default();
        registry
            .sub_registry_with_prefix(SUBSYSTEM)
            .register(BLOCK_HEIGHT, "Latest block height", block_height.clone());

        Self {
            registry,
            block_height,
            written: RwLock::new(HashMap::new()),
        }
    }

    fn written(&self) -> RwLockReadGuard<'_, HashMap<String, FloatGauge>> {
        self.written.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set the block height for `network`
    pub fn set_block_height(&self, network: &str, height: f64) {
        if let Some(gauge) = self.written().get(network) {
            gauge.set(height);
            return;
        }

        let gauge = self
            .block_height
            .get_or_create(&NetworkLabels::new(network))
            .clone();
        gauge.set(height);
        self.written
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(network.to_string(), gauge);
    }

    /// Reset the block height for `network` to zero
    pub fn reset_block_height(&self, network: &str) {
        self.set_block_height(network, 0.0);
    }

    /// Current block height for `network`, `None` until the first write.
    ///
    /// Reading does not create the series.
    pub fn block_height(&self, network: &str) -> Option<f64> {
        self.written().get(network).map(FloatGauge::get)
    }

    /// Encode all metrics in the text exposition format
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buffer = String::new();
        encode(&mut buffer, &self.registry)?;
        Ok(buffer)
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}
