//! Build metadata, injected at compile time.
//!
//! Release builds set `SAK_VERSION`, `SAK_GIT_COMMIT` and `SAK_BUILD_TIME`
//! in the build environment; local builds fall back to placeholders.

use serde::Serialize;

/// Release version string.
pub const VERSION: &str = match option_env!("SAK_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

/// Git commit the binary was built from.
pub const GIT_COMMIT: &str = match option_env!("SAK_GIT_COMMIT") {
    Some(v) => v,
    None => "MISSING GIT COMMIT",
};

/// Build timestamp.
pub const BUILD_TIME: &str = match option_env!("SAK_BUILD_TIME") {
    Some(v) => v,
    None => "MISSING BUILD TIME",
};

/// Body of `GET /version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_commit: &'static str,
    pub build_time: &'static str,
}

impl VersionInfo {
    pub const fn current() -> Self {
        Self {
            version: VERSION,
            git_commit: GIT_COMMIT,
            build_time: BUILD_TIME,
        }
    }
}

/// `<version> (<commit>)`, used in the startup log line.
pub fn full_version() -> String {
    format!("{VERSION} ({GIT_COMMIT})")
}
