//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use swiss_army_knife::config::{AppConfig, Mode};
use swiss_army_knife::http::HttpServer;
use swiss_army_knife::lifecycle::{self, DrainOutcome, Shutdown};
use tokio::task::JoinHandle;

/// A server running on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Arc<Shutdown>,
    pub handle: JoinHandle<std::io::Result<DrainOutcome>>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server with default settings.
pub async fn start_server(mode: Mode) -> TestServer {
    start_server_with(mode, AppConfig::default()).await
}

/// Start a server with the given settings. The configured port is ignored.
pub async fn start_server_with(mode: Mode, config: AppConfig) -> TestServer {
    let listener = lifecycle::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Arc::new(Shutdown::new());

    let server = HttpServer::new(config, mode, Arc::clone(&shutdown));
    let handle = tokio::spawn(server.run(listener));

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Poll until `condition` holds or two seconds pass.
pub async fn wait_until<F>(mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    for _ in 0..200 {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
