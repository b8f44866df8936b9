//! Service configuration resolved once at startup
//!
//! Everything the handlers need is read from a [`RuntimeEnv`] snapshot, so
//! resolution never touches process globals after startup and tests can supply
//! their own environment.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_MOUNT_PATH: &str = "MOUNT_PATH";
pub const ENV_SCRATCH_PATH: &str = "SCRATCH_PATH";
/// Set by Cloud Run in every service container
pub const ENV_CLOUD_RUN_MARKER: &str = "K_SERVICE";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_PORT: &str = "PORT";
pub const ENV_DEPLOYED_VERSION: &str = "DEPLOYED_VERSION";
pub const ENV_SELF_TEST: &str = "STARTUP_SELF_TEST";

/// Where Cloud Run mounts the bucket when `MOUNT_PATH` is not set
pub const CLOUD_RUN_MOUNT_PATH: &str = "/mnt/storage";
/// Memory-backed scratch directory on Cloud Run
pub const CLOUD_RUN_SCRATCH_PATH: &str = "/tmp";
pub const DEFAULT_PORT: u16 = 8080;

const ADC_FILE: &str = "application_default_credentials.json";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(
        "Cannot determine the runtime environment: set MOUNT_PATH, run on Cloud Run, \
         or log in with `gcloud auth application-default login`"
    )]
    UnknownEnvironment,

    #[error("Invalid PORT value '{0}'")]
    InvalidPort(String),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Snapshot of the process environment
#[derive(Debug, Clone, Default)]
pub struct RuntimeEnv {
    vars: HashMap<String, String>,
    home_dir: Option<PathBuf>,
    current_dir: PathBuf,
}

impl RuntimeEnv {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
            home_dir: dirs::home_dir(),
            current_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Empty environment rooted at `current_dir`
    pub fn new(current_dir: impl Into<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_home_dir(mut self, home: impl Into<PathBuf>) -> Self {
        self.home_dir = Some(home.into());
        self
    }

    /// Non-empty value of `key`
    pub fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    pub fn is_cloud_run(&self) -> bool {
        self.var(ENV_CLOUD_RUN_MARKER).is_some()
    }

    /// Location of the gcloud Application Default Credentials file
    ///
    /// `%APPDATA%\gcloud` on Windows, `~/.config/gcloud` elsewhere.
    pub fn adc_credentials_path(&self) -> Option<PathBuf> {
        let home = self.home_dir.as_ref()?;
        let gcloud_dir = if cfg!(windows) {
            home.join("AppData").join("Roaming").join("gcloud")
        } else {
            home.join(".config").join("gcloud")
        };
        Some(gcloud_dir.join(ADC_FILE))
    }

    /// True on a developer machine where `gcloud auth application-default login` ran
    pub fn has_local_credentials(&self) -> bool {
        self.adc_credentials_path().is_some_and(|p| p.is_file())
    }

    fn resolve(&self, explicit_key: &str, cloud_run_default: &str) -> Result<PathBuf, ServiceError> {
        if let Some(path) = self.var(explicit_key) {
            return Ok(PathBuf::from(path));
        }
        if self.is_cloud_run() {
            return Ok(PathBuf::from(cloud_run_default));
        }
        if self.has_local_credentials() {
            return Ok(self.current_dir.clone());
        }
        Err(ServiceError::UnknownEnvironment)
    }
}

/// Bucket mount path: `MOUNT_PATH`, then Cloud Run's default, then the working
/// directory on a developer machine
pub fn resolve_mount_path(env: &RuntimeEnv) -> Result<PathBuf, ServiceError> {
    env.resolve(ENV_MOUNT_PATH, CLOUD_RUN_MOUNT_PATH)
}

/// Scratch directory: `SCRATCH_PATH`, then `/tmp` on Cloud Run, then the
/// working directory on a developer machine
pub fn resolve_scratch_path(env: &RuntimeEnv) -> Result<PathBuf, ServiceError> {
    env.resolve(ENV_SCRATCH_PATH, CLOUD_RUN_SCRATCH_PATH)
}

/// Immutable application configuration, built once and shared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub llm_provider: String,
    pub embedding_model: String,
    pub max_step_iterations: u32,
    pub mount_path: PathBuf,
    pub scratch_path: PathBuf,
    /// Run the write/read check on the mount and scratch paths during the startup probe
    pub self_test: bool,
    pub port: u16,
    pub deployed_version: Option<String>,
}

impl ServiceConfig {
    pub fn from_env(env: &RuntimeEnv) -> Result<Self, ServiceError> {
        let port = match env.var(ENV_PORT) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ServiceError::InvalidPort(raw.to_string()))?,
            None => DEFAULT_PORT,
        };
        let self_test = !env
            .var(ENV_SELF_TEST)
            .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "false" | "0" | "no"));

        Ok(Self {
            llm_provider: "openai".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_step_iterations: 3,
            mount_path: resolve_mount_path(env)?,
            scratch_path: resolve_scratch_path(env)?,
            self_test,
            port,
            deployed_version: env.var(ENV_DEPLOYED_VERSION).map(String::from),
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_env(home: &Path, cwd: &Path) -> RuntimeEnv {
        let adc = RuntimeEnv::new(cwd)
            .with_home_dir(home)
            .adc_credentials_path()
            .unwrap();
        std::fs::create_dir_all(adc.parent().unwrap()).unwrap();
        std::fs::write(&adc, "{}").unwrap();
        RuntimeEnv::new(cwd).with_home_dir(home)
    }

    #[test]
    fn test_explicit_mount_path_wins() {
        let env = RuntimeEnv::new("/work")
            .with_var(ENV_CLOUD_RUN_MARKER, "svc")
            .with_var(ENV_MOUNT_PATH, "/data");
        assert_eq!(resolve_mount_path(&env).unwrap(), PathBuf::from("/data"));
        assert_eq!(resolve_scratch_path(&env).unwrap(), PathBuf::from("/tmp"));
    }

    #[test]
    fn test_cloud_run_defaults() {
        let env = RuntimeEnv::new("/work").with_var(ENV_CLOUD_RUN_MARKER, "svc");
        assert_eq!(
            resolve_mount_path(&env).unwrap(),
            PathBuf::from(CLOUD_RUN_MOUNT_PATH)
        );
    }

    #[test]
    fn test_local_credentials_use_working_dir() {
        let home = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        let env = local_env(home.path(), cwd.path());
        assert!(env.has_local_credentials());
        assert_eq!(resolve_mount_path(&env).unwrap(), cwd.path());
        assert_eq!(resolve_scratch_path(&env).unwrap(), cwd.path());
    }

    #[test]
    fn test_unknown_environment() {
        let home = tempfile::tempdir().unwrap();
        let env = RuntimeEnv::new("/work").with_home_dir(home.path());
        assert!(matches!(
            resolve_mount_path(&env),
            Err(ServiceError::UnknownEnvironment)
        ));
        assert!(ServiceConfig::from_env(&env).is_err());
    }

    #[test]
    fn test_empty_variable_is_unset() {
        let env = RuntimeEnv::new("/work")
            .with_var(ENV_MOUNT_PATH, "  ")
            .with_var(ENV_CLOUD_RUN_MARKER, "svc");
        assert_eq!(
            resolve_mount_path(&env).unwrap(),
            PathBuf::from(CLOUD_RUN_MOUNT_PATH)
        );
    }

    #[test]
    fn test_service_config_from_env() {
        let env = RuntimeEnv::new("/work")
            .with_var(ENV_CLOUD_RUN_MARKER, "svc")
            .with_var(ENV_PORT, "9090")
            .with_var(ENV_DEPLOYED_VERSION, "0.2.0")
            .with_var(ENV_SELF_TEST, "false");
        let config = ServiceConfig::from_env(&env).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.deployed_version.as_deref(), Some("0.2.0"));
        assert!(!config.self_test);
        assert_eq!(config.max_step_iterations, 3);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:9090");
    }

    #[test]
    fn test_defaults_and_bad_port() {
        let env = RuntimeEnv::new("/work").with_var(ENV_CLOUD_RUN_MARKER, "svc");
        let config = ServiceConfig::from_env(&env).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.self_test);

        let env = env.with_var(ENV_PORT, "http");
        assert!(matches!(
            ServiceConfig::from_env(&env),
            Err(ServiceError::InvalidPort(v)) if v == "http"
        ));
    }
}
