//! This module provides common utilities for integration testing: a hand-driven
//! HTTP responder for transport-failure scenarios and a Vault container.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    ContainerAsync, GenericImage, ImageExt,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Set up logging for tests
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_test_writer() // This ensures output goes to both stdout and test output
        .try_init();
}

/// A local server that answers the first `answered` connections with
/// `body` and then accepts connections without ever replying.
pub struct StallingVault {
    pub addr: String,
    connections: Arc<AtomicUsize>,
}

impl StallingVault {
    pub async fn start(answered: usize, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = format!("http://{}", listener.local_addr().unwrap());
        let connections = Arc::new(AtomicUsize::new(0));
        let counter = connections.clone();

        tokio::spawn(async move {
            let mut stalled = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n < answered {
                    tokio::spawn(respond(stream, body));
                } else {
                    stalled.push(stream);
                }
            }
        });

        Self { addr, connections }
    }

    /// Number of connections accepted so far.
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

async fn respond(mut stream: TcpStream, body: &'static str) {
    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    // Request bodies here are small enough to arrive with the headers.
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => return,
            Ok(n) => request.extend_from_slice(&buf[..n]),
        }
    }
    let response = format!(
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

/// Starts a Vault server with file storage, uninitialized and sealed.
pub async fn setup_vault_container() -> ContainerAsync<GenericImage> {
    let vault_local_config = r#"
    {"storage": {"file": {"path": "/vault/file"}},
     "listener": [{"tcp": { "address": "0.0.0.0:8200", "tls_disable": true}}],
     "default_lease_ttl": "168h", "max_lease_ttl": "720h", "ui": true}
    "#;
    GenericImage::new("hashicorp/vault", "1.18.4")
        .with_exposed_port(8200.tcp())
        .with_wait_for(WaitFor::message_on_stdout("Vault server started!"))
        .with_env_var("VAULT_LOCAL_CONFIG", vault_local_config)
        .with_cmd(vec!["server"])
        .with_cap_add("IPC_LOCK")
        .start()
        .await
        .unwrap()
}

/// Initializes a fresh Vault and returns its unseal keys.
pub async fn init_vault(addr: &str, secret_shares: u8, secret_threshold: u8) -> Vec<String> {
    let client = reqwest::Client::new();
    let resp = client
        .put(format!("{}/v1/sys/init", addr))
        .json(&serde_json::json!({
            "secret_shares": secret_shares,
            "secret_threshold": secret_threshold
        }))
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success(), "init failed: {}", resp.status());
    let json: serde_json::Value = resp.json().await.unwrap();
    json["keys"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}

/// Wait for Vault to answer its seal-status endpoint
pub async fn wait_for_vault(addr: &str, max_retries: usize) {
    let client = reqwest::Client::new();
    let url = format!("{}/v1/sys/seal-status", addr);
    for _ in 0..max_retries {
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    panic!("Vault not ready at {} after {} attempts", addr, max_retries);
}
