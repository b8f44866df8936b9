//! Service version detection
//!
//! Reads the version string declared in the entry-point source so the deployed
//! revision can report it through `DEPLOYED_VERSION`.

use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Version reported when the entry point declares none
pub const VERSION_DEFAULT: &str = "0.0.0";
/// Version reported when the entry point does not exist
pub const VERSION_UNKNOWN: &str = "unknown";
/// Version reported when the entry point cannot be read
pub const VERSION_ERROR: &str = "error";

/// Matches `version = "1.2.3"`, `__version__ = '1.2.3'` and
/// `const VERSION: &str = "1.2.3"`
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b_*version_*\s*(?::[^=\n]*)?=\s*["']([^"']+)["']"#)
        .expect("version pattern compiles")
});

/// Extract the first declared version from source text
pub fn parse_version(content: &str) -> Option<&str> {
    VERSION_RE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Get the version declared in the entry-point file
///
/// Never fails: a missing file yields `"unknown"`, an unreadable one `"error"`,
/// and a file without a declaration `"0.0.0"`.
pub fn get_app_version(path: &Path) -> String {
    if !path.is_file() {
        return VERSION_UNKNOWN.to_string();
    }
    match std::fs::read_to_string(path) {
        Ok(content) => parse_version(&content)
            .unwrap_or(VERSION_DEFAULT)
            .to_string(),
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            VERSION_ERROR.to_string()
        }
    }
}

/// Module name used to launch the service: the file name without directories
/// or extension (`bin/rest_api_server.rs` -> `rest_api_server`)
pub fn entry_module_name(entrypoint: &str) -> &str {
    let file_name = entrypoint
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(entrypoint)
        .trim();
    file_name
        .split('.')
        .next()
        .unwrap_or(file_name)
        .trim()
}
