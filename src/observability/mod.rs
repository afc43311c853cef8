//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline produces:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (container runtime)
//!     → Metrics endpoint (Prometheus scrape, only when METRICS_PORT is set)
//! ```

pub mod logging;
pub mod metrics;
