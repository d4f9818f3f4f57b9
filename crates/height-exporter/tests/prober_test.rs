//! Integration tests for the Prober against a fake full-service

use async_trait::async_trait;
use fullservice_client::{BlockHeightSource, ProbeError, RpcClient, RpcError, StatusProbe};
use height_exporter::{MetricsRegistry, Prober};
use mockito::{Server, ServerGuard};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const WALLET_PATH: &str = "/wallet/v2";

/// Helper to build a prober backed by the real status probe
fn status_prober(server: &ServerGuard, metrics: Arc<MetricsRegistry>) -> Prober {
    let client = RpcClient::new(format!("{}{}", server.url(), WALLET_PATH), Duration::from_secs(2))
        .expect("client should build");
    Prober::new(
        Arc::new(StatusProbe::new(client)),
        metrics,
        "main",
        Duration::from_millis(10),
        Duration::from_secs(2),
    )
}

/// Helper to render a get_network_status reply
fn status_body(height: &str) -> String {
    format!(
        r#"{{"method":"get_network_status","result":{{"network_status":{{"network_block_height":"{}"}}}},"jsonrpc":"2.0","id":1}}"#,
        height
    )
}

/// Source failing a fixed number of times before reporting a height
struct FlakySource {
    failures: usize,
    height: f64,
    attempts: AtomicUsize,
    attempt_tx: mpsc::UnboundedSender<usize>,
}

#[async_trait]
impl BlockHeightSource for FlakySource {
    async fn fetch_block_height(&self) -> Result<f64, ProbeError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.attempt_tx.send(attempt);

        if attempt <= self.failures {
            Err(RpcError::Timeout(Duration::from_millis(1)).into())
        } else {
            Ok(self.height)
        }
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::test]
async fn test_successful_probe_sets_gauge() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", WALLET_PATH)
        .with_status(200)
        .with_body(status_body("123456"))
        .create_async()
        .await;

    let metrics = Arc::new(MetricsRegistry::new());
    let prober = status_prober(&server, metrics.clone());

    prober.probe_once().await.expect("probe should succeed");

    assert_eq!(metrics.block_height("main"), Some(123456.0));
}

#[tokio::test]
async fn test_http_500_resets_gauge() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", WALLET_PATH)
        .with_status(500)
        .create_async()
        .await;

    let metrics = Arc::new(MetricsRegistry::new());
    metrics.set_block_height("main", 999.0);
    let prober = status_prober(&server, metrics.clone());

    let err = prober.probe_once().await.unwrap_err();

    assert_eq!(err.kind(), "status");
    assert_eq!(metrics.block_height("main"), Some(0.0));
}

#[tokio::test]
async fn test_non_numeric_height_resets_gauge() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", WALLET_PATH)
        .with_status(200)
        .with_body(status_body("not-a-number"))
        .create_async()
        .await;

    let metrics = Arc::new(MetricsRegistry::new());
    metrics.set_block_height("main", 999.0);
    let prober = status_prober(&server, metrics.clone());

    let err = prober.probe_once().await.unwrap_err();

    assert_eq!(err.kind(), "parse");
    assert_eq!(metrics.block_height("main"), Some(0.0));
}

#[tokio::test]
async fn test_decode_error_resets_gauge() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", WALLET_PATH)
        .with_status(200)
        .with_body("{\"result\": ")
        .create_async()
        .await;

    let metrics = Arc::new(MetricsRegistry::new());
    metrics.set_block_height("main", 999.0);
    let prober = status_prober(&server, metrics.clone());

    let err = prober.probe_once().await.unwrap_err();

    assert_eq!(err.kind(), "decode");
    assert_eq!(metrics.block_height("main"), Some(0.0));
}

#[tokio::test]
async fn test_unreachable_service_resets_gauge() {
    let client = RpcClient::new("http://127.0.0.1:1/wallet/v2", Duration::from_millis(500)).unwrap();
    let metrics = Arc::new(MetricsRegistry::new());
    metrics.set_block_height("main", 999.0);
    let prober = Prober::new(
        Arc::new(StatusProbe::new(client)),
        metrics.clone(),
        "main",
        Duration::from_millis(10),
        Duration::from_secs(1),
    );

    let err = prober.probe_once().await.unwrap_err();

    assert!(!err.is_fatal());
    assert_eq!(metrics.block_height("main"), Some(0.0));
}

#[tokio::test]
async fn test_loop_survives_consecutive_failures() {
    const FAILURES: usize = 4;

    let (attempt_tx, mut attempt_rx) = mpsc::unbounded_channel();
    let source = FlakySource {
        failures: FAILURES,
        height: 4242.0,
        attempts: AtomicUsize::new(0),
        attempt_tx,
    };

    let metrics = Arc::new(MetricsRegistry::new());
    let prober = Prober::new(
        Arc::new(source),
        metrics.clone(),
        "main",
        Duration::from_millis(5),
        Duration::from_secs(1),
    );
    let handle = tokio::spawn(prober.run());

    // N failures followed by one more attempt
    for expected in 1..=FAILURES + 1 {
        let attempt = tokio::time::timeout(Duration::from_secs(2), attempt_rx.recv())
            .await
            .expect("Timeout waiting for probe attempt")
            .expect("Channel closed");
        assert_eq!(attempt, expected);
    }

    // Give the successful attempt time to land in the gauge
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(metrics.block_height("main"), Some(4242.0));
    assert!(!handle.is_finished(), "prober must keep running");

    handle.abort();
}

#[tokio::test]
async fn test_loop_keeps_fixed_cadence_while_failing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", WALLET_PATH)
        .with_status(503)
        .expect_at_least(3)
        .create_async()
        .await;

    let metrics = Arc::new(MetricsRegistry::new());
    let prober = status_prober(&server, metrics.clone());
    let handle = tokio::spawn(prober.run());

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(!handle.is_finished(), "prober must keep running");
    assert_eq!(metrics.block_height("main"), Some(0.0));
    mock.assert_async().await;

    handle.abort();
}
