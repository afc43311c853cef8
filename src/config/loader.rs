//! Configuration loading from the process environment.
//!
//! Invalid values never abort startup: the documented default is used and a
//! [`ConfigWarning`] is returned so the caller can log it once the log sink
//! is up.

use thiserror::Error;

use crate::config::schema::{AppConfig, DEFAULT_PORT};

pub const ENV_DEBUG: &str = "DEBUG";
pub const ENV_PORT: &str = "PORT";
pub const ENV_METRICS_PORT: &str = "METRICS_PORT";

/// An environment value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key} ({reason}), using default {default}")]
pub struct ConfigWarning {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
    pub default: String,
}

/// Result of a configuration load.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Load configuration from the real process environment.
pub fn load_from_env() -> LoadedConfig {
    load_from(|key| std::env::var(key).ok())
}

/// Load configuration through an arbitrary variable lookup.
pub fn load_from<F>(lookup: F) -> LoadedConfig
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    let defaults = AppConfig::default();

    let debug = parse_or_default(&lookup, ENV_DEBUG, defaults.debug, parse_bool, &mut warnings);
    let port = parse_or_default(&lookup, ENV_PORT, DEFAULT_PORT, parse_port, &mut warnings);
    let metrics_port = match lookup(ENV_METRICS_PORT) {
        None => None,
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => match parse_port(&raw) {
            Ok(port) => Some(port),
            Err(reason) => {
                warnings.push(ConfigWarning {
                    key: ENV_METRICS_PORT,
                    value: raw,
                    reason,
                    default: "disabled".to_string(),
                });
                None
            }
        },
    };

    LoadedConfig {
        config: AppConfig {
            debug,
            port,
            metrics_port,
            ..defaults
        },
        warnings,
    }
}

fn parse_or_default<F, T, P>(
    lookup: &F,
    key: &'static str,
    default: T,
    parse: P,
    warnings: &mut Vec<ConfigWarning>,
) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::fmt::Display,
    P: Fn(&str) -> Result<T, String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };

    match parse(&raw) {
        Ok(value) => value,
        Err(reason) => {
            warnings.push(ConfigWarning {
                key,
                value: raw,
                reason,
                default: default.to_string(),
            });
            default
        }
    }
}

/// Accepts `1/0`, `t/f` and `true/false` in lower, upper and title case.
fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err("not a boolean".to_string()),
    }
}

fn parse_port(raw: &str) -> Result<u16, String> {
    raw.trim().parse::<u16>().map_err(|e| e.to_string())
}
