//! cloudrun-kit-core - shared library for cloudrun-kit
//!
//! Two independent halves live here:
//! - [`config`] and [`generate`]: the offline artifact generator
//! - [`service`]: the template REST service deployed to Cloud Run

pub mod config;
pub mod generate;
pub mod service;

pub use config::{
    ConfigError, ConfigMap, EnvVarList, ValidationError, display_validation_errors,
    load_constants, load_env_file, validate_constants,
};
pub use generate::{GenerateError, GenerateOptions, GenerateReport, ProjectLayout, generate_files};
pub use service::{AppState, ReadinessGate, RuntimeEnv, ServiceConfig, ServiceError, router};

/// Get the version of cloudrun-kit-core
pub fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
