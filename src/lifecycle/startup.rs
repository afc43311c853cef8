//! Startup orchestration.
//!
//! Binding is the only fatal step: a port that cannot be bound ends the
//! process with a non-zero exit code.

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the HTTP listener on the configured port.
pub async fn bind_listener(config: &AppConfig) -> Result<TcpListener, StartupError> {
    bind(&config.bind_address()).await
}

/// Bind a listener on an explicit address.
pub async fn bind(address: &str) -> Result<TcpListener, StartupError> {
    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.to_string(),
            source,
        })?;

    if let Ok(local) = listener.local_addr() {
        log_bound(local);
    }
    Ok(listener)
}

fn log_bound(addr: SocketAddr) {
    tracing::info!(address = %addr, "Listening for connections");
}
