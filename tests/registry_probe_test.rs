use kafka_init::config::{KafkaConfig, RegistryConfig, RetryConfig};
use kafka_init::kafka::{AdminOps, ClusterAdmin};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

fn admin_for(url: &str, probe_timeout_ms: u64) -> ClusterAdmin {
    let kafka = KafkaConfig {
        bootstrap_servers: vec!["localhost:9092".to_string()],
        topic_names: vec!["events".to_string()],
        num_partitions: 1,
        replication_factor: 1,
    };
    let registry = RegistryConfig {
        url: url.to_string(),
        probe_timeout_ms,
    };
    ClusterAdmin::new(&kafka, &registry, &RetryConfig::default()).unwrap()
}

/// Answers every connection with the given raw bytes, then closes it.
async fn spawn_fixture(response: &'static [u8]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_probe_reports_up_on_success_status() {
    let url = spawn_fixture(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
        .await;
    let admin = admin_for(&url, 2000);

    assert!(admin.probe_schema_registry().await.is_up());
}

#[tokio::test]
async fn test_probe_reports_down_on_server_error() {
    let url = spawn_fixture(
        b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
    )
    .await;
    let admin = admin_for(&url, 2000);

    assert!(!admin.probe_schema_registry().await.is_up());
}

#[tokio::test]
async fn test_probe_reports_down_on_malformed_response() {
    let url = spawn_fixture(b"this is not http\r\n\r\n").await;
    let admin = admin_for(&url, 2000);

    assert!(!admin.probe_schema_registry().await.is_up());
}

#[tokio::test]
async fn test_probe_reports_down_when_server_never_answers() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((_socket, _)) = listener.accept().await {
            // Hold the connection open without ever answering
            std::future::pending::<()>().await
        }
    });
    let admin = admin_for(&format!("http://{}", addr), 250);

    assert!(!admin.probe_schema_registry().await.is_up());
}

#[tokio::test]
async fn test_probe_reports_down_on_connection_refused() {
    // Bind to grab a free port, then close it again before probing
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let admin = admin_for(&format!("http://{}", addr), 2000);

    assert!(!admin.probe_schema_registry().await.is_up());
}
