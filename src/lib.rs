//! Swiss-army-knife: a cluster diagnostic HTTP endpoint.
//!
//! Serves an HTML dashboard describing the pod, node, client and the
//! services discovered in the environment, or (in echo mode) mirrors each
//! request back as JSON. Both modes expose `/healthz` and `/version` and
//! drain in-flight requests on SIGINT/SIGTERM.

pub mod config;
pub mod discovery;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod templates;
pub mod version;

pub use config::{AppConfig, Mode};
pub use error::AppError;
pub use http::HttpServer;
pub use lifecycle::{DrainOutcome, Shutdown};
