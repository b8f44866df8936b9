//! Startup readiness gate
//!
//! The service starts listening immediately, but traffic should only arrive
//! once the bucket mount is usable. Cloud Run polls `/ready` until it answers
//! 200; after that the gate latches and never goes back.

use super::config::ServiceConfig;
use super::fileio::file_io_self_test;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{error, info, warn};

/// Uploaded to the bucket by the deploy pipeline; its presence means the mount is live
pub const SENTINEL_FILE: &str = "startup_probe.txt";

pub const PROBE_WAITING_DETAIL: &str = "Waiting for GCS FUSE mount to stabilize.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The gate was already open; nothing was checked
    AlreadyReady,
    /// This probe found the mount and opened the gate
    BecameReady,
}

/// Reasons the startup probe is not passing yet
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Mount path {} does not exist", .0.display())]
    MountMissing(PathBuf),

    #[error("Sentinel {} not found", .0.display())]
    SentinelMissing(PathBuf),

    #[error("Cannot create scratch directory {}: {source}", path.display())]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O self-test failed on {}: {source}", path.display())]
    SelfTest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for ProbeError {
    fn into_response(self) -> Response {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "detail": PROBE_WAITING_DETAIL })),
        )
            .into_response()
    }
}

/// One-way readiness latch plus the checks that open it
#[derive(Debug)]
pub struct ReadinessGate {
    ready: AtomicBool,
    mount_path: PathBuf,
    scratch_path: PathBuf,
    self_test: bool,
}

impl ReadinessGate {
    pub fn new(mount_path: impl Into<PathBuf>, scratch_path: impl Into<PathBuf>, self_test: bool) -> Self {
        Self {
            ready: AtomicBool::new(false),
            mount_path: mount_path.into(),
            scratch_path: scratch_path.into(),
            self_test,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.mount_path, &config.scratch_path, config.self_test)
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn mount_path(&self) -> &Path {
        &self.mount_path
    }

    pub fn sentinel_path(&self) -> PathBuf {
        self.mount_path.join(SENTINEL_FILE)
    }

    /// Check the mount once and open the gate if it is usable
    ///
    /// Idempotent: after the gate opens, later calls return
    /// [`ProbeOutcome::AlreadyReady`] without touching the filesystem. There is
    /// no internal retry; the platform re-polls on its own schedule.
    pub async fn probe(&self) -> Result<ProbeOutcome, ProbeError> {
        if self.is_ready() {
            return Ok(ProbeOutcome::AlreadyReady);
        }

        if !is_dir(&self.mount_path).await {
            warn!("Mount path {} not present yet", self.mount_path.display());
            return Err(ProbeError::MountMissing(self.mount_path.clone()));
        }

        let sentinel = self.sentinel_path();
        if !is_file(&sentinel).await {
            error!("Startup probe failed: {} not found", sentinel.display());
            return Err(ProbeError::SentinelMissing(sentinel));
        }
        info!("Startup probe found {}", sentinel.display());

        if self.self_test {
            self.run_self_test(&self.mount_path).await?;
        }

        if !is_dir(&self.scratch_path).await {
            tokio::fs::create_dir_all(&self.scratch_path)
                .await
                .map_err(|source| {
                    error!("Cannot create scratch directory {}: {source}", self.scratch_path.display());
                    ProbeError::ScratchDir {
                        path: self.scratch_path.clone(),
                        source,
                    }
                })?;
        }

        if self.self_test {
            self.run_self_test(&self.scratch_path).await?;
        }

        self.ready.store(true, Ordering::Release);
        info!("Startup probe succeeded, service is ready");
        Ok(ProbeOutcome::BecameReady)
    }

    async fn run_self_test(&self, dir: &Path) -> Result<(), ProbeError> {
        file_io_self_test(dir).await.map(|_| ()).map_err(|source| {
            error!("I/O self-test failed on {}: {source}", dir.display());
            ProbeError::SelfTest {
                path: dir.to_path_buf(),
                source,
            }
        })
    }
}

// Metadata lookups go through tokio::fs; on a FUSE mount they can block for a while
async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir())
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path).await.is_ok_and(|m| m.is_file())
}
