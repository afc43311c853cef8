//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! process environment (PORT, DEBUG, METRICS_PORT)
//!     → loader.rs (parse, fall back to defaults, collect warnings)
//!     → AppConfig (immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults; a bad value never prevents startup
//! - The loader takes a lookup function so tests never touch the real environment

pub mod loader;
pub mod schema;

pub use loader::{load_from, load_from_env, ConfigWarning, LoadedConfig};
pub use schema::{AppConfig, Mode, TimeoutConfig};
