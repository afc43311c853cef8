//! Request middleware.
//!
//! Layer order, outermost first:
//! 1. `access_log`: one record before dispatch, one after, plus metrics
//! 2. `track_in_flight`: holds an [`InFlightGuard`](crate::lifecycle::InFlightGuard) while the handler runs
//! 3. `TimeoutLayer`: upper bound on a single request

use std::sync::Arc;
use std::time::Instant;

use axum::body::HttpBody;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, HeaderName};
use axum::middleware::Next;
use axum::response::Response;

use crate::discovery::UNKNOWN;
use crate::http::request::{peer_address, resolve_client_address};
use crate::lifecycle::Shutdown;
use crate::observability::logging::sanitize_field;
use crate::observability::metrics;

/// Routes reported as metric labels; anything else is `other`.
const KNOWN_ROUTES: [&str; 3] = ["/", "/healthz", "/version"];

/// Log each request before and after it is handled.
///
/// Every field taken from the request goes through [`sanitize_field`].
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let peer = peer_address(&request);
    let client = resolve_client_address(request.headers(), peer);
    let remote_addr = sanitize_field(&peer.map_or_else(|| UNKNOWN.to_string(), |p| p.to_string()));
    let client_addr = sanitize_field(&client.address);
    let method = sanitize_field(request.method().as_str());
    let url = sanitize_field(&request.uri().to_string());
    let host = sanitize_field(&header_text(request.headers(), &header::HOST));
    let user_agent = sanitize_field(&header_text(request.headers(), &header::USER_AGENT));
    let referer = sanitize_field(&header_text(request.headers(), &header::REFERER));
    let route = route_label(request.uri().path());

    tracing::info!(
        remote_addr = %remote_addr,
        method = %method,
        url = %url,
        "Received request"
    );

    let response = next.run(request).await;

    let status = response.status().as_u16();
    let response_size = response_size(&response);
    let elapsed = start.elapsed();

    tracing::info!(
        remote_addr = %client_addr,
        ip_source = %client.source,
        method = %method,
        url = %url,
        status,
        response_size,
        response_time = elapsed.as_secs_f64(),
        user_agent = %user_agent,
        referer = %referer,
        host = %host,
        "Processed request"
    );

    metrics::record_request(&method, route, status, start);
    response
}

/// Count the request as in flight until its response is produced.
pub async fn track_in_flight(
    State(shutdown): State<Arc<Shutdown>>,
    request: Request,
    next: Next,
) -> Response {
    let guard = shutdown.in_flight_guard();
    metrics::record_in_flight(shutdown.in_flight_count());

    let response = next.run(request).await;

    drop(guard);
    metrics::record_in_flight(shutdown.in_flight_count());
    response
}

fn header_text(headers: &HeaderMap, name: &HeaderName) -> String {
    headers
        .get(name)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .unwrap_or_default()
}

fn route_label(path: &str) -> &'static str {
    KNOWN_ROUTES
        .iter()
        .find(|route| **route == path)
        .copied()
        .unwrap_or("other")
}

/// Body length when known up front, else the declared `Content-Length`, else 0.
fn response_size(response: &Response) -> u64 {
    if let Some(exact) = response.body().size_hint().exact() {
        return exact;
    }
    response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
