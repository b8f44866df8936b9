//! Template REST service deployed to Cloud Run
//!
//! This module provides:
//! - Runtime environment resolution (mount path, scratch path, port)
//! - The readiness gate polled by the Cloud Run startup probe
//! - The I/O self-test run against the bucket mount
//! - The axum router with the probe and calculator endpoints

mod config;
mod fileio;
pub mod readiness;
mod routes;

pub use config::{
    CLOUD_RUN_MOUNT_PATH, CLOUD_RUN_SCRATCH_PATH, DEFAULT_PORT, ENV_API_KEY, RuntimeEnv,
    ServiceConfig, ServiceError, resolve_mount_path, resolve_scratch_path,
};
pub use fileio::{SELF_TEST_FILE, file_io_self_test};
pub use readiness::{ProbeError, ProbeOutcome, ReadinessGate, SENTINEL_FILE};
pub use routes::{AppState, CalculatorInput, CalculatorOutput, StatusResponse, mask_api_key, router};
