//! Configuration schema definitions.
//!
//! All settings come from the process environment and are loaded once at
//! startup. Types derive Serde traits so the effective config can be dumped
//! in debug logs.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Root configuration for the diagnostic server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Verbose logging with caller file/line in every record.
    pub debug: bool,

    /// Port the HTTP listener binds on all interfaces.
    pub port: u16,

    /// Port for the Prometheus exporter. `None` disables metrics.
    pub metrics_port: Option<u16>,

    /// Server-level timeouts.
    pub timeouts: TimeoutConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            port: DEFAULT_PORT,
            metrics_port: None,
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl AppConfig {
    /// Address the HTTP listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Timeout configuration for the serving loop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound for reading a request and writing its response, in seconds.
    /// Also bounds how long a client may take to send request headers.
    pub request_secs: u64,

    /// A connection with no I/O for this long is closed, in seconds.
    pub idle_secs: u64,

    /// How long in-flight requests may run after a termination signal, in seconds.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 10 * 60,
            idle_secs: 60 * 60,
            shutdown_grace_secs: 10,
        }
    }
}

impl TimeoutConfig {
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn idle(&self) -> Duration {
        Duration::from_secs(self.idle_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Which document the `/` route serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// HTML dashboard with node identity, discovered services and headers.
    #[default]
    Dashboard,
    /// JSON mirror of the inbound request.
    Echo,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Dashboard => write!(f, "dashboard"),
            Mode::Echo => write!(f, "echo"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert!(!config.debug);
        assert_eq!(config.port, 8080);
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.timeouts.request(), Duration::from_secs(600));
        assert_eq!(config.timeouts.idle(), Duration::from_secs(3600));
        assert_eq!(config.timeouts.shutdown_grace(), Duration::from_secs(10));
    }

    #[test]
    fn bind_address_uses_all_interfaces() {
        let config = AppConfig {
            port: 9000,
            ..AppConfig::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn mode_displays_lowercase() {
        assert_eq!(Mode::Dashboard.to_string(), "dashboard");
        assert_eq!(Mode::Echo.to_string(), "echo");
    }
}
