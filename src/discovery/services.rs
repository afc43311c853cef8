//! Peer service discovery from orchestrator-injected environment variables.
//!
//! Kubernetes injects `<SERVICE>_PORT=tcp://10.0.0.1:80` for every service
//! visible to the pod. Scanning the environment for that shape recovers the
//! list of linked services without touching the network.

use std::collections::BTreeMap;
use std::ffi::OsString;

/// Suffix a variable name must carry to be considered a service link.
const PORT_SUFFIX: &str = "_PORT";

/// Endpoint schemes recognised as service links.
const LINK_SCHEMES: [&str; 2] = ["tcp://", "udp://"];

/// Discovered service name → raw endpoint value.
pub type ServiceMap = BTreeMap<String, String>;

/// Scan key/value pairs for service links.
///
/// A pair qualifies when the key ends in `_PORT` and the value starts with
/// `tcp://` or `udp://`. Matching is case-sensitive.
pub fn scan<I, K, V>(vars: I) -> ServiceMap
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut services = ServiceMap::new();
    for (key, value) in vars {
        if let Some(name) = service_name(key.as_ref(), value.as_ref()) {
            services.insert(name.to_string(), value.as_ref().to_string());
        }
    }
    services
}

/// Scan raw `KEY=value` entries. Entries without an `=` are skipped.
pub fn scan_entries<I, S>(entries: I) -> ServiceMap
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut services = ServiceMap::new();
    for entry in entries {
        if let Some((key, value)) = entry.as_ref().split_once('=') {
            if let Some(name) = service_name(key, value) {
                services.insert(name.to_string(), value.to_string());
            }
        }
    }
    services
}

/// Scan the live process environment.
///
/// Read on every call so variables changed after startup are visible.
/// Variables that are not valid UTF-8 cannot be links and are skipped.
pub fn scan_process_env() -> ServiceMap {
    scan(std::env::vars_os().filter_map(|(k, v)| utf8_pair(k, v)))
}

fn utf8_pair(key: OsString, value: OsString) -> Option<(String, String)> {
    Some((key.into_string().ok()?, value.into_string().ok()?))
}

fn service_name<'a>(key: &'a str, value: &str) -> Option<&'a str> {
    let name = key.strip_suffix(PORT_SUFFIX)?;
    if name.is_empty() {
        return None;
    }
    LINK_SCHEMES
        .iter()
        .any(|scheme| value.starts_with(scheme))
        .then_some(name)
}
