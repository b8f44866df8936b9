//! Container and Cloud Run deployment constants
//!
//! These values are baked into the rendered Dockerfile and cloudbuild.yaml.
//! The service reads `PORT` at runtime, so [`APP_PORT`] only sets the default.

/// Port the container listens on (Cloud Run convention)
pub const APP_PORT: u16 = 8080;

/// Default Rust toolchain image tag, overridable with `--build-arg RUST_VER=...`
pub const RUST_VERSION_DEFAULT: &str = "1.89";

// =============================================================================
// Cloud Run resource profile
// =============================================================================
//
// One request at a time per instance, one warm instance, and no CPU throttling
// so the instance keeps working between requests. The startup probe polls
// /ready until the bucket mount is usable.
// =============================================================================

pub const RUN_CPU: &str = "2";
pub const RUN_MEMORY: &str = "2Gi";
pub const RUN_CONCURRENCY: u32 = 1;
pub const RUN_MIN_INSTANCES: u32 = 1;

/// Path polled by the Cloud Run startup probe
pub const STARTUP_PROBE_PATH: &str = "/ready";
pub const STARTUP_PROBE_INITIAL_DELAY_SECS: u32 = 10;
pub const STARTUP_PROBE_FAILURE_THRESHOLD: u32 = 15;
pub const STARTUP_PROBE_PERIOD_SECS: u32 = 20;
pub const STARTUP_PROBE_TIMEOUT_SECS: u32 = 5;

/// `--startup-probe` argument for `gcloud run deploy`
pub fn startup_probe_arg() -> String {
    format!(
        "httpGet.port={APP_PORT},httpGet.path={STARTUP_PROBE_PATH},\
initialDelaySeconds={STARTUP_PROBE_INITIAL_DELAY_SECS},\
failureThreshold={STARTUP_PROBE_FAILURE_THRESHOLD},\
periodSeconds={STARTUP_PROBE_PERIOD_SECS},\
timeoutSeconds={STARTUP_PROBE_TIMEOUT_SECS}"
    )
}
