//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber from the loaded config
//! - Neutralize control characters in fields that come from requests
//!
//! # Design Decisions
//! - `DEBUG=true` raises the crate level to debug and adds file/line to records
//! - `RUST_LOG` overrides the computed filter
//! - Records go to stderr; stdout stays free for the process supervisor

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::AppConfig;

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &AppConfig) -> String {
    let level = if config.debug { "debug" } else { "info" };
    format!("swiss_army_knife={level},tower_http=info")
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(config.debug)
                .with_line_number(config.debug),
        )
        .init();
}

/// Escape `\n`, `\r` and `\t` so request data cannot forge log lines.
pub fn sanitize_field(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
