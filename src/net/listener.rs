//! Accept loop.
//!
//! # Responsibilities
//! - Accept incoming TCP connections and hand each to its own task
//! - Stop accepting the moment shutdown is triggered
//! - Wait for open connections to finish their graceful close
//!
//! Connection tasks live in a [`JoinSet`] owned by the loop, so aborting the
//! loop's task also aborts every connection still open.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::{JoinError, JoinSet};

use crate::config::TimeoutConfig;
use crate::lifecycle::Shutdown;
use crate::net::connection::serve_connection;

/// Pause after a failed accept, e.g. when the process is out of descriptors.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Serve `router` on `listener` until shutdown, then drain open connections.
pub async fn serve(
    listener: TcpListener,
    router: Router,
    timeouts: TimeoutConfig,
    shutdown: Arc<Shutdown>,
) {
    let mut connections = JoinSet::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to accept connection");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                        continue;
                    }
                };
                if shutdown.is_triggered() {
                    break;
                }
                if let Err(e) = stream.set_nodelay(true) {
                    tracing::debug!(peer_addr = %peer, error = %e, "Failed to set TCP_NODELAY");
                }

                tracing::debug!(peer_addr = %peer, open = connections.len() + 1, "Connection accepted");
                connections.spawn(serve_connection(
                    stream,
                    peer,
                    router.clone(),
                    timeouts.clone(),
                    Arc::clone(&shutdown),
                ));
            }
            Some(joined) = connections.join_next(), if !connections.is_empty() => {
                reap(joined);
            }
            () = shutdown.triggered() => break,
        }
    }

    drop(listener);
    tracing::debug!(open = connections.len(), "Stopped accepting connections");

    while let Some(joined) = connections.join_next().await {
        reap(joined);
    }
}

fn reap(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        if e.is_panic() {
            tracing::error!(error = %e, "Connection task panicked");
        }
    }
}
