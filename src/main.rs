//! Swiss-army-knife diagnostic server.
//!
//! # Architecture Overview
//!
//! ```text
//!     SIGINT / SIGTERM ──▶ lifecycle::signals ──▶ Shutdown (watch + state)
//!                                                      │
//!     Client ──▶ TcpListener ──▶ http::server ◀────────┘
//!                                   │
//!                       access_log ─┼─ track_in_flight ─ timeout
//!                                   ▼
//!                      dashboard | echo, /healthz, /version
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;

use swiss_army_knife::config::{self, Mode};
use swiss_army_knife::http::HttpServer;
use swiss_army_knife::lifecycle::{self, signals, DrainOutcome, Shutdown};
use swiss_army_knife::observability::{logging, metrics};
use swiss_army_knife::version;

#[derive(Parser, Debug)]
#[command(name = "swiss-army-knife", version = version::VERSION, about = "Cluster diagnostic HTTP endpoint")]
struct Cli {
    /// What `/` serves.
    #[arg(long, value_enum, default_value_t = Mode::Dashboard)]
    mode: Mode,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let loaded = config::load_from_env();
    logging::init(&loaded.config);
    for warning in &loaded.warnings {
        tracing::warn!(
            key = warning.key,
            value = %warning.value,
            default = %warning.default,
            "{warning}"
        );
    }
    let config = loaded.config;

    tracing::info!(
        version = %version::full_version(),
        mode = %cli.mode,
        port = config.port,
        debug = config.debug,
        "swiss-army-knife starting"
    );

    if let Some(port) = config.metrics_port {
        metrics::init_metrics(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    let listener = lifecycle::bind_listener(&config).await.inspect_err(|e| {
        tracing::error!(error = %e, "Failed to start server");
    })?;

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_handler(Arc::clone(&shutdown));

    let outcome = HttpServer::new(config, cli.mode, shutdown)
        .run(listener)
        .await?;

    match outcome {
        DrainOutcome::Clean => tracing::info!("Server stopped"),
        DrainOutcome::Forced { abandoned } => {
            tracing::warn!(abandoned, "Server stopped with requests abandoned")
        }
    }
    Ok(())
}
