//! Runtime environment introspection.
//!
//! # Data Flow
//! ```text
//! process environment
//!     → services.rs (<NAME>_PORT=tcp://... → ServiceMap)
//!     → node.rs (hostname, POD_NAMESPACE, NODE_NAME, NODE_IP → NodeContext)
//!     → dashboard / echo handlers
//! ```
//!
//! # Design Decisions
//! - Nothing is cached: every request sees the environment as it is now
//! - Scanning is a pure function over key/value pairs; the process
//!   environment is only one possible input

pub mod node;
pub mod services;

pub use node::{hostname, NodeContext, UNKNOWN};
pub use services::{scan, scan_entries, scan_process_env, ServiceMap};
