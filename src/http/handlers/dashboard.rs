//! `GET /` in dashboard mode.

use axum::extract::{Request, State};
use axum::response::Html;

use crate::discovery::{self, NodeContext};
use crate::error::AppError;
use crate::http::request::RequestSnapshot;
use crate::http::server::AppState;
use crate::templates::DashboardTemplate;

/// Render the HTML dashboard for this request.
pub async fn dashboard(
    State(state): State<AppState>,
    request: Request,
) -> Result<Html<String>, AppError> {
    let snapshot = RequestSnapshot::capture(request).await?;

    let page = DashboardTemplate {
        node: NodeContext::current(),
        client_address: snapshot.client_address,
        headers: snapshot.headers,
        version: state.version.version.to_string(),
        services: discovery::scan_process_env(),
    };

    let html = page.render_html()?;
    tracing::debug!(services = page.services.len(), bytes = html.len(), "Dashboard rendered");
    Ok(Html(html))
}
