//! Deployment constants schema
//!
//! Defines the keys read from `gcp/gcp_constants.txt` and the immutable map
//! that holds them for the duration of one generator run.

use serde::Serialize;
use std::collections::BTreeMap;

/// Primary Google Cloud project id
pub const KEY_PROJECT_ID: &str = "GCP_PROJ_ID";
/// Project hosting the BigQuery data (defaults to [`KEY_PROJECT_ID`])
pub const KEY_BQ_PROJECT_ID: &str = "GCP_BQ_PROJ_ID";
pub const KEY_REGION: &str = "GCP_REGION";
pub const KEY_BILLING_ACCOUNT: &str = "GCP_BILLING_ACCOUNT";
pub const KEY_BUCKET: &str = "GCP_GS_BUCKET";
pub const KEY_BUCKET_LOCATION: &str = "GCP_GS_BUCKET_LOCATION";
pub const KEY_DATASET_ID: &str = "GCP_BQ_DATASET_ID";
pub const KEY_REPOSITORY: &str = "GCP_REPOSITORY";
pub const KEY_IMAGE: &str = "GCP_IMAGE";
/// Cloud Run service name
pub const KEY_RUN_SERVICE: &str = "GCP_RUN_JOB";
pub const KEY_VOLUME_NAME: &str = "GCP_RUN_JOB_VOL_NAME";
pub const KEY_MOUNT_PATH: &str = "GCP_RUN_JOB_VOL_MT_PATH";
pub const KEY_SVC_ACCOUNT_PREFIX: &str = "GCP_SVC_ACT_PREFIX";
/// Entry-point source filename under `src/`
pub const KEY_ENTRYPOINT: &str = "APP_ENTRYPOINT";
/// Older constants files name the entry point this way
pub const KEY_ENTRYPOINT_LEGACY: &str = "PYTHON_FILENAME";

/// Keys whose values must never be printed in full
pub const SENSITIVE_KEYS: &[&str] = &[KEY_BILLING_ACCOUNT];

/// Flat deployment configuration loaded from the constants file
///
/// Keys are unique; the map is never mutated after loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: BTreeMap<String, String>,
}

impl ConfigMap {
    /// Value for `key`, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Value for `key`, or the empty string when absent
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or("")
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Project hosting BigQuery data, falling back to the primary project
    pub fn bq_project_id(&self) -> Option<&str> {
        self.get(KEY_BQ_PROJECT_ID)
            .filter(|v| !v.is_empty())
            .or_else(|| self.get(KEY_PROJECT_ID))
    }

    /// Entry-point filename, accepting the legacy key
    pub fn entrypoint(&self) -> Option<&str> {
        self.get(KEY_ENTRYPOINT)
            .or_else(|| self.get(KEY_ENTRYPOINT_LEGACY))
            .filter(|v| !v.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Ordered `KEY=VALUE` lines read from `src/.env`
///
/// Order matters: the list is serialized verbatim into the deploy step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvVarList(Vec<String>);

impl EnvVarList {
    pub fn new(entries: Vec<String>) -> Self {
        Self(entries)
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined form used by `gcloud run deploy --set-env-vars`
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_overwrites_duplicates() {
        let map: ConfigMap = [("A", "1"), ("A", "2")].into_iter().collect();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("A"), Some("2"));
    }

    #[test]
    fn test_bq_project_defaults_to_primary() {
        let map: ConfigMap = [(KEY_PROJECT_ID, "my-proj-1")].into_iter().collect();
        assert_eq!(map.bq_project_id(), Some("my-proj-1"));

        let map: ConfigMap = [(KEY_PROJECT_ID, "my-proj-1"), (KEY_BQ_PROJECT_ID, "bq-data-01")]
            .into_iter()
            .collect();
        assert_eq!(map.bq_project_id(), Some("bq-data-01"));
    }

    #[test]
    fn test_entrypoint_prefers_new_key() {
        let map: ConfigMap = [
            (KEY_ENTRYPOINT_LEGACY, "old.py"),
            (KEY_ENTRYPOINT, "rest_api_server.rs"),
        ]
        .into_iter()
        .collect();
        assert_eq!(map.entrypoint(), Some("rest_api_server.rs"));

        let legacy: ConfigMap = [(KEY_ENTRYPOINT_LEGACY, "old.py")].into_iter().collect();
        assert_eq!(legacy.entrypoint(), Some("old.py"));
    }

    #[test]
    fn test_env_list_joined_keeps_order() {
        let env = EnvVarList::new(vec!["B=2".to_string(), "A=1".to_string()]);
        assert_eq!(env.joined(), "B=2,A=1");
        assert_eq!(EnvVarList::default().joined(), "");
    }
}
