//! HTTP server for Prometheus metrics endpoint.

use crate::metrics::MetricsRegistry;
use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// HTTP server for metrics endpoint
pub struct MetricsServer {
    /// Metrics registry
    registry: Arc<MetricsRegistry>,
    /// Listen address
    listen_addr: String,
}

impl MetricsServer {
    /// Create a new metrics server
    pub fn new(registry: Arc<MetricsRegistry>, listen_addr: String) -> Self {
        Self {
            registry,
            listen_addr,
        }
    }

    /// Configured listen address
    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }

    /// Router serving `GET /metrics`
    pub fn router(registry: Arc<MetricsRegistry>) -> Router {
        Router::new()
            .route("/metrics", get(metrics_handler))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(registry)
    }

    /// Bind the listen address
    pub async fn bind(&self) -> std::io::Result<TcpListener> {
        let listener = TcpListener::bind(&self.listen_addr).await?;
        info!(listen_addr = %self.listen_addr, "Metrics server listening");
        Ok(listener)
    }

    /// Serve metrics on an already bound listener until the process exits
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = Self::router(self.registry);
        axum::serve(listener, app).await
    }

    /// Bind and run the HTTP server
    pub async fn run(self) -> std::io::Result<()> {
        info!(listen_addr = %self.listen_addr, "Starting metrics HTTP server");
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}

/// Handler for /metrics endpoint
async fn metrics_handler(State(registry): State<Arc<MetricsRegistry>>) -> Response {
    let buffer = match registry.encode() {
        Ok(buffer) => buffer,
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to encode metrics: {}", e),
            )
                .into_response();
        }
    };

    // Return with correct content type
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        buffer,
    )
        .into_response()
}
