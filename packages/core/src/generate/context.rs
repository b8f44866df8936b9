//! Template variables derived from the validated constants

use super::GenerateError;
use super::dockerfile::{
    APP_PORT, RUN_CONCURRENCY, RUN_CPU, RUN_MEMORY, RUN_MIN_INSTANCES, RUST_VERSION_DEFAULT,
    startup_probe_arg,
};
use crate::config::schema::*;
use crate::config::{ConfigMap, EnvVarList};
use crate::service::readiness::SENTINEL_FILE;
use serde::Serialize;
use tera::Context;

/// Every value the artifact templates reference
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DeploymentContext {
    pub project_id: String,
    pub bq_project_id: String,
    /// True when BigQuery data lives in a different project
    pub cross_project: bool,
    pub region: String,
    pub billing_account: String,
    pub bucket: String,
    pub bucket_location: String,
    pub dataset_id: String,
    pub repository: String,
    pub image: String,
    pub run_service: String,
    pub volume_name: String,
    pub mount_path: String,
    pub svc_account_prefix: String,
    pub service_account: String,
    pub entry_module: String,
    pub app_version: String,
    pub app_port: u16,
    pub rust_version: String,
    pub sentinel_file: String,
    pub startup_probe: String,
    pub deploy_env: String,
    pub cpu: String,
    pub memory: String,
    pub concurrency: u32,
    pub min_instances: u32,
}

fn require(constants: &ConfigMap, key: &str) -> Result<String, GenerateError> {
    constants
        .get(key)
        .map(String::from)
        .ok_or_else(|| GenerateError::MissingKey(key.to_string()))
}

/// `--set-env-vars` value: mount path and version first, then `.env` entries
fn deploy_env(app_version: &str, env_vars: &EnvVarList) -> String {
    let mut parts = vec![
        "MOUNT_PATH=${_MOUNT_PATH}".to_string(),
        format!("DEPLOYED_VERSION={app_version}"),
    ];
    if !env_vars.is_empty() {
        parts.push(env_vars.joined());
    }
    parts.join(",")
}

impl DeploymentContext {
    pub fn new(
        constants: &ConfigMap,
        env_vars: &EnvVarList,
        entry_module: &str,
        app_version: &str,
    ) -> Result<Self, GenerateError> {
        let project_id = require(constants, KEY_PROJECT_ID)?;
        let bq_project_id = constants
            .bq_project_id()
            .unwrap_or(project_id.as_str())
            .to_string();
        let svc_account_prefix = require(constants, KEY_SVC_ACCOUNT_PREFIX)?;

        Ok(Self {
            cross_project: bq_project_id != project_id,
            service_account: format!("{svc_account_prefix}@{project_id}.iam.gserviceaccount.com"),
            region: require(constants, KEY_REGION)?,
            billing_account: require(constants, KEY_BILLING_ACCOUNT)?,
            bucket: require(constants, KEY_BUCKET)?,
            bucket_location: require(constants, KEY_BUCKET_LOCATION)?,
            dataset_id: require(constants, KEY_DATASET_ID)?,
            repository: require(constants, KEY_REPOSITORY)?,
            image: require(constants, KEY_IMAGE)?,
            run_service: require(constants, KEY_RUN_SERVICE)?,
            volume_name: require(constants, KEY_VOLUME_NAME)?,
            mount_path: require(constants, KEY_MOUNT_PATH)?,
            entry_module: entry_module.to_string(),
            app_version: app_version.to_string(),
            app_port: APP_PORT,
            rust_version: RUST_VERSION_DEFAULT.to_string(),
            sentinel_file: SENTINEL_FILE.to_string(),
            startup_probe: startup_probe_arg(),
            deploy_env: deploy_env(app_version, env_vars),
            cpu: RUN_CPU.to_string(),
            memory: RUN_MEMORY.to_string(),
            concurrency: RUN_CONCURRENCY,
            min_instances: RUN_MIN_INSTANCES,
            project_id,
            bq_project_id,
            svc_account_prefix,
        })
    }

    pub fn to_tera(&self) -> Result<Context, GenerateError> {
        Context::from_serialize(self).map_err(|source| GenerateError::Render {
            name: "(context)".to_string(),
            source,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn full_constants() -> ConfigMap {
        [
            (KEY_PROJECT_ID, "my-proj-1"),
            (KEY_REGION, "us-east4"),
            (KEY_BILLING_ACCOUNT, "0X0X0X-0X0X0X-0X0X0X"),
            (KEY_BUCKET, "my-bucket-1"),
            (KEY_BUCKET_LOCATION, "US-EAST4"),
            (KEY_DATASET_ID, "ds_main"),
            (KEY_REPOSITORY, "my-repo"),
            (KEY_IMAGE, "rest-api"),
            (KEY_RUN_SERVICE, "rest-api-svc"),
            (KEY_VOLUME_NAME, "bucket-vol"),
            (KEY_MOUNT_PATH, "/mnt/storage"),
            (KEY_SVC_ACCOUNT_PREFIX, "run-sa"),
            (KEY_ENTRYPOINT, "bin/rest_api_server.rs"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_context_from_constants() {
        let env = EnvVarList::new(vec!["A=1".to_string(), "B=2".to_string()]);
        let ctx = DeploymentContext::new(&full_constants(), &env, "rest_api_server", "0.2.0")
            .unwrap();
        assert_eq!(ctx.service_account, "run-sa@my-proj-1.iam.gserviceaccount.com");
        assert_eq!(ctx.bq_project_id, "my-proj-1");
        assert!(!ctx.cross_project);
        assert_eq!(
            ctx.deploy_env,
            "MOUNT_PATH=${_MOUNT_PATH},DEPLOYED_VERSION=0.2.0,A=1,B=2"
        );
    }

    #[test]
    fn test_empty_env_has_no_trailing_comma() {
        let ctx = DeploymentContext::new(
            &full_constants(),
            &EnvVarList::default(),
            "rest_api_server",
            "0.0.0",
        )
        .unwrap();
        assert_eq!(ctx.deploy_env, "MOUNT_PATH=${_MOUNT_PATH},DEPLOYED_VERSION=0.0.0");
    }

    #[test]
    fn test_cross_project_when_bq_project_differs() {
        let constants: ConfigMap = full_constants()
            .iter()
            .chain([(KEY_BQ_PROJECT_ID, "bq-data-v0-0")])
            .collect();
        let ctx =
            DeploymentContext::new(&constants, &EnvVarList::default(), "server", "1.0.0").unwrap();
        assert!(ctx.cross_project);
        assert_eq!(ctx.bq_project_id, "bq-data-v0-0");
    }

    #[test]
    fn test_missing_key_is_reported() {
        let constants: ConfigMap = full_constants()
            .iter()
            .filter(|(k, _)| *k != KEY_IMAGE)
            .collect();
        let err = DeploymentContext::new(&constants, &EnvVarList::default(), "server", "1.0.0")
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingKey(k) if k == KEY_IMAGE));
    }
}
