//! Exporter process wiring.

use crate::config::Config;
use crate::http_server::MetricsServer;
use crate::metrics::MetricsRegistry;
use crate::prober::Prober;
use common::{Error, Result};
use fullservice_client::{RpcClient, StatusProbe};
use std::sync::Arc;
use tracing::{error, info};

/// Block height exporter: one background prober plus the metrics endpoint
pub struct ExporterServer {
    config: Config,
    metrics: Arc<MetricsRegistry>,
}

impl ExporterServer {
    /// Create a new exporter with a fresh metrics registry
    pub fn new(config: Config) -> Self {
        Self::with_registry(config, Arc::new(MetricsRegistry::new()))
    }

    /// Create a new exporter around an existing registry
    pub fn with_registry(config: Config, metrics: Arc<MetricsRegistry>) -> Self {
        Self { config, metrics }
    }

    /// Shared metrics registry
    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        self.metrics.clone()
    }

    /// Run the exporter.
    ///
    /// Returns an error if the listener cannot be bound, if the server
    /// stops, or if the prober hits a fatal error. Probe failures are
    /// otherwise absorbed by the prober.
    pub async fn run(self) -> Result<()> {
        info!(
            url = %self.config.full_service_url,
            network = %self.config.mc_network,
            num_of_nodes = self.config.num_of_nodes,
            "Starting block height exporter"
        );

        let client = RpcClient::new(self.config.full_service_url.clone(), self.config.timeout)
            .map_err(Error::probe)?;
        let prober = Prober::new(
            Arc::new(StatusProbe::new(client)),
            self.metrics.clone(),
            self.config.mc_network.clone(),
            self.config.check_wait,
            self.config.timeout,
        );

        // Bind before probing so a taken port fails the process right away
        let server = MetricsServer::new(self.metrics.clone(), self.config.listen_addr());
        let listener = server.bind().await.map_err(|e| {
            error!(listen_addr = %self.config.listen_addr(), error = %e, "Unable to bind metrics listener");
            Error::metrics(format!("bind {}: {}", self.config.listen_addr(), e))
        })?;
        info!(
            "Serving metrics at {}/metrics",
            self.config.listen_addr()
        );

        let prober_handle = tokio::spawn(async move { prober.run().await });

        tokio::select! {
            result = server.serve(listener) => {
                result?;
                info!("Metrics server completed");
                Ok(())
            }
            result = prober_handle => {
                match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(Error::probe(e)),
                    Err(e) => Err(Error::other(format!("prober task failed: {}", e))),
                }
            }
        }
    }
}
