//! Flat `KEY=VALUE` file loading
//!
//! Shared by the constants file and the `.env` file. Blank lines, `#`
//! comments and lines without `=` are skipped without complaint.

use super::schema::{ConfigMap, EnvVarList};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors raised while reading a flat config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Lines that carry a `KEY=VALUE` assignment, trimmed
fn assignment_lines(content: &str) -> impl Iterator<Item = &str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && line.contains('='))
}

/// Parse file content into a [`ConfigMap`]
///
/// Each line is split on its first `=`; both sides are trimmed.
pub fn parse_key_values(content: &str) -> ConfigMap {
    let map: ConfigMap = assignment_lines(content)
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect();

    let skipped = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .count()
        .saturating_sub(assignment_lines(content).count());
    if skipped > 0 {
        debug!("Skipped {skipped} comment or malformed line(s)");
    }

    map
}

/// Parse `.env` content, keeping each assignment line verbatim and in order
pub fn parse_env_lines(content: &str) -> EnvVarList {
    EnvVarList::new(assignment_lines(content).map(String::from).collect())
}

fn read_existing(path: &Path) -> Result<String, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load the deployment constants file
pub fn load_constants(path: &Path) -> Result<ConfigMap, ConfigError> {
    let content = read_existing(path)?;
    let map = parse_key_values(&content);
    debug!("Loaded {} constant(s) from {}", map.len(), path.display());
    Ok(map)
}

/// Load the `.env` file injected into the deployed container
///
/// The file must exist but may be empty.
pub fn load_env_file(path: &Path) -> Result<EnvVarList, ConfigError> {
    let content = read_existing(path)?;
    Ok(parse_env_lines(&content))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_first_equals() {
        let map = parse_key_values("URL = https://x.io/?a=b\n");
        assert_eq!(map.get("URL"), Some("https://x.io/?a=b"));
    }

    #[test]
    fn test_parse_skips_comments_blank_and_malformed() {
        let content = "# comment\n\n  GCP_REGION = us-east4  \nnot an assignment\n#X=1\n";
        let map = parse_key_values(content);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("GCP_REGION"), Some("us-east4"));
        assert!(!map.contains_key("#X"));
    }

    #[test]
    fn test_parse_allows_empty_value() {
        let map = parse_key_values("EMPTY=\n");
        assert_eq!(map.get("EMPTY"), Some(""));
    }

    #[test]
    fn test_parse_env_lines_preserves_order_and_text() {
        let env = parse_env_lines("B=2\n# skip\nA = 1\n\nnoequals\n");
        assert_eq!(env.entries(), ["B=2".to_string(), "A = 1".to_string()]);
    }

    #[test]
    fn test_load_constants_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_constants(&dir.path().join("gcp_constants.txt")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.to_string().contains("gcp_constants.txt"));
    }

    #[test]
    fn test_load_env_file_empty_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "").unwrap();
        let env = load_env_file(&path).unwrap();
        assert!(env.is_empty());
    }
}
