//! Pod and node identity, read fresh on every request.

use serde::Serialize;

/// Placeholder for any identity field that cannot be determined.
pub const UNKNOWN: &str = "unknown";

pub const ENV_HOSTNAME: &str = "HOSTNAME";
pub const ENV_POD_NAMESPACE: &str = "POD_NAMESPACE";
pub const ENV_NODE_NAME: &str = "NODE_NAME";
pub const ENV_NODE_IP: &str = "NODE_IP";

/// Identity of the pod serving the request and the node it runs on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeContext {
    pub hostname: String,
    pub namespace: String,
    pub node_name: String,
    #[serde(rename = "nodeIP")]
    pub node_ip: String,
}

impl NodeContext {
    /// Read identity from the OS and the downward-API environment variables.
    pub fn current() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build identity through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let field = |key: &str| non_empty(lookup(key)).unwrap_or_else(|| UNKNOWN.to_string());
        Self {
            hostname: resolve_hostname(&lookup),
            namespace: field(ENV_POD_NAMESPACE),
            node_name: field(ENV_NODE_NAME),
            node_ip: field(ENV_NODE_IP),
        }
    }
}

/// Hostname of this process.
///
/// Asks the OS first, then `HOSTNAME`, then falls back to [`UNKNOWN`].
pub fn hostname() -> String {
    resolve_hostname(|key| std::env::var(key).ok())
}

fn resolve_hostname<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    match hostname::get() {
        Ok(name) if !name.is_empty() => name.to_string_lossy().into_owned(),
        Ok(_) => non_empty(lookup(ENV_HOSTNAME)).unwrap_or_else(|| UNKNOWN.to_string()),
        Err(e) => {
            tracing::error!(error = %e, "Error getting hostname");
            non_empty(lookup(ENV_HOSTNAME)).unwrap_or_else(|| UNKNOWN.to_string())
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
