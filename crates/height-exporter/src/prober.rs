//! Fixed-interval block height prober.

use crate::metrics::MetricsRegistry;
use fullservice_client::{BlockHeightSource, ProbeError, RpcError};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info, warn};

/// Polls a [`BlockHeightSource`] and mirrors the result into the gauge.
///
/// A failed cycle resets the gauge to zero so scrapers never read a stale
/// height. The pause between cycles is fixed.
pub struct Prober {
    source: Arc<dyn BlockHeightSource>,
    metrics: Arc<MetricsRegistry>,
    network: String,
    interval: Duration,
    timeout: Duration,
}

impl Prober {
    /// Create a new prober
    pub fn new(
        source: Arc<dyn BlockHeightSource>,
        metrics: Arc<MetricsRegistry>,
        network: impl Into<String>,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            metrics,
            network: network.into(),
            interval,
            timeout,
        }
    }

    /// Network label this prober writes
    pub fn network(&self) -> &str {
        &self.network
    }

    /// Run one probe and apply the outcome to the gauge.
    ///
    /// The probe is abandoned once the time budget expires and counts as
    /// failed.
    pub async fn probe_once(&self) -> Result<f64, ProbeError> {
        let outcome = match timeout(self.timeout, self.source.fetch_block_height()).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout(self.timeout).into()),
        };

        match &outcome {
            Ok(height) => {
                debug!(network = %self.network, height = *height, "Set block height metric");
                self.metrics.set_block_height(&self.network, *height);
            }
            Err(e) => {
                warn!(
                    network = %self.network,
                    source = self.source.name(),
                    kind = e.kind(),
                    error = %e,
                    "Block height probe failed"
                );
                self.metrics.reset_block_height(&self.network);
            }
        }

        outcome
    }

    /// Probe forever.
    ///
    /// Returns only when a probe fails in a way retrying cannot fix.
    pub async fn run(self) -> Result<(), ProbeError> {
        info!(
            network = %self.network,
            source = self.source.name(),
            interval_secs = self.interval.as_secs_f64(),
            timeout_secs = self.timeout.as_secs_f64(),
            "Prober starting"
        );

        loop {
            if let Err(e) = self.probe_once().await {
                if e.is_fatal() {
                    error!(network = %self.network, error = %e, "Prober stopping on fatal error");
                    return Err(e);
                }
            }

            sleep(self.interval).await;
        }
    }
}
