//! cloudrun-kit-server - Template REST service for Cloud Run
//!
//! Configured entirely through the environment (PORT, MOUNT_PATH, LOG_LEVEL, ...).

fn main() -> anyhow::Result<()> {
    cloudrun_kit::run_server()
}
