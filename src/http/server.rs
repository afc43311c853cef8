//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router for the selected mode
//! - Wire up middleware (access log, in-flight tracking, timeout)
//! - Serve until shutdown is triggered, then drain within the grace period

use std::sync::Arc;

use axum::{
    middleware,
    routing::{any, get},
    Router,
};
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;

use crate::config::{AppConfig, Mode};
use crate::http::handlers::{dashboard, echo, healthz, version};
use crate::http::middleware::{access_log, track_in_flight};
use crate::lifecycle::{DrainOutcome, Shutdown};
use crate::net;
use crate::version::VersionInfo;

/// Application state injected into handlers.
///
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub version: VersionInfo,
    pub shutdown: Arc<Shutdown>,
}

/// HTTP server for the diagnostic endpoints.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
    mode: Mode,
    shutdown: Arc<Shutdown>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig, mode: Mode, shutdown: Arc<Shutdown>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            version: VersionInfo::current(),
            shutdown: Arc::clone(&shutdown),
        };

        let router = Self::build_router(&config, mode, state);
        Self {
            router,
            config,
            mode,
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, mode: Mode, state: AppState) -> Router {
        let root = match mode {
            Mode::Dashboard => get(dashboard),
            Mode::Echo => any(echo),
        };

        Router::new()
            .route("/", root)
            .route("/healthz", get(healthz))
            .route("/version", get(version))
            .layer(TimeoutLayer::new(config.timeouts.request()))
            .layer(middleware::from_fn_with_state(
                Arc::clone(&state.shutdown),
                track_in_flight,
            ))
            .layer(middleware::from_fn(access_log))
            .with_state(state)
    }

    /// A clone of the router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until shutdown is triggered, then drain.
    ///
    /// After the trigger no new connections are accepted. Requests already
    /// accepted get the configured grace period to finish; whatever is still
    /// running after that is abandoned and reported in the outcome.
    pub async fn run(self, listener: TcpListener) -> Result<DrainOutcome, std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, mode = %self.mode, "HTTP server starting");

        let mut serving = tokio::spawn(net::serve(
            listener,
            self.router,
            self.config.timeouts.clone(),
            Arc::clone(&self.shutdown),
        ));
        self.shutdown.mark_running();

        tokio::select! {
            joined = &mut serving => {
                self.shutdown.mark_stopped();
                joined.map_err(std::io::Error::other)?;
                tracing::info!("HTTP server stopped");
                return Ok(DrainOutcome::Clean);
            }
            () = self.shutdown.triggered() => {}
        }

        let grace = self.config.timeouts.shutdown_grace();
        tracing::info!(
            grace_secs = grace.as_secs(),
            in_flight = self.shutdown.in_flight_count(),
            "Draining in-flight requests"
        );

        let outcome = match tokio::time::timeout(grace, &mut serving).await {
            Ok(joined) => {
                joined.map_err(std::io::Error::other)?;
                DrainOutcome::Clean
            }
            Err(_) => {
                let abandoned = self.shutdown.in_flight_count();
                serving.abort();
                tracing::error!(
                    abandoned,
                    grace_secs = grace.as_secs(),
                    "Server shutdown failed: grace period elapsed with requests in flight"
                );
                DrainOutcome::Forced { abandoned }
            }
        };

        self.shutdown.mark_stopped();
        tracing::info!("HTTP server stopped");
        Ok(outcome)
    }
}
