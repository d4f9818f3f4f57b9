//! Block height exporter binary

use height_exporter::{Config, ExporterServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Can't use tracing yet - the log level comes from the configuration
    let config = Config::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    common::logging::init_with_format(config.log_format, config.log_level)?;

    tracing::info!(
        listen_addr = %config.listen_addr(),
        check_wait_secs = config.check_wait.as_secs(),
        timeout_secs = config.timeout.as_secs(),
        "Block height exporter starting"
    );

    let server = ExporterServer::new(config);
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "Block height exporter stopped");
        return Err(e.into());
    }

    Ok(())
}
