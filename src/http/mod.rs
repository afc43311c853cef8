//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, graceful drain)
//!     → middleware.rs (access log, in-flight tracking)
//!     → handlers/ (dashboard | echo, healthz, version)
//!     → request.rs (client address, headers, query, body snapshot)
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{AddressSource, ClientAddress, RequestSnapshot};
pub use server::{AppState, HttpServer};
