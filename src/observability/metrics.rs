//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sak_http_requests_total` (counter): requests by method, route, status
//! - `sak_http_request_duration_seconds` (histogram): latency by method, route
//! - `sak_http_requests_in_flight` (gauge): requests currently being served
//!
//! Without an installed exporter every call below is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    counter!(
        "sak_http_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "sak_http_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Publish the current in-flight request count.
pub fn record_in_flight(count: u64) {
    gauge!("sak_http_requests_in_flight").set(count as f64);
}
