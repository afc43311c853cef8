//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (accept loop, stops on shutdown)
//!     → connection.rs (hyper connection, idle deadline, graceful close)
//!     → Hand off to the axum router
//! ```

pub mod connection;
pub mod listener;

pub use connection::{serve_connection, Activity, ConnectionId, IdleStream};
pub use listener::serve;
