//! Liveness and build metadata endpoints.

use axum::extract::State;
use axum::Json;

use crate::http::server::AppState;
use crate::version::VersionInfo;

/// Liveness probe. Answers `ok` for as long as the process serves requests,
/// draining included.
pub async fn healthz() -> &'static str {
    "ok"
}

/// Build metadata as JSON.
pub async fn version(State(state): State<AppState>) -> Json<VersionInfo> {
    tracing::debug!("Version requested");
    Json(state.version)
}
