//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Init logging → Bind listener (fatal on failure) → Serve
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     Running → Draining (stop accepting, grace period starts)
//!             → Stopped (clean, or forced when the grace period elapses)
//! ```
//!
//! # Design Decisions
//! - The grace period is measured from signal receipt, not from process start
//! - A forced drain is logged as an error but still exits 0

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{DrainOutcome, InFlightGuard, LifecycleState, Shutdown};
pub use startup::{bind, bind_listener, StartupError};
