//! Template service runner
//!
//! Resolves configuration from the environment once, then serves the router
//! on `0.0.0.0:$PORT` until SIGTERM (sent by Cloud Run on scale-down) or Ctrl-C.

use crate::logging::{ENV_LOG_FORMAT, ENV_LOG_LEVEL, LogFormat, init_server_logging};
use anyhow::{Context, Result};
use cloudrun_kit_core::service::ENV_API_KEY;
use cloudrun_kit_core::{AppState, RuntimeEnv, ServiceConfig, ServiceError, get_version, router};
use tracing::{info, warn};

pub async fn cmd_serve() -> Result<()> {
    let env = RuntimeEnv::from_process();

    let format = match env.var(ENV_LOG_FORMAT).map(str::parse::<LogFormat>) {
        Some(Ok(format)) => format,
        Some(Err(e)) => {
            eprintln!("{e}, falling back to text");
            LogFormat::Text
        }
        None => LogFormat::Text,
    };
    init_server_logging(env.var(ENV_LOG_LEVEL), format)?;

    let config = ServiceConfig::from_env(&env).context("Service configuration failed")?;
    info!(
        "cloudrun-kit-server v{} (deployed version {})",
        get_version(),
        config.deployed_version.as_deref().unwrap_or("unknown")
    );
    info!("Mount path: {}", config.mount_path.display());
    info!("Scratch path: {}", config.scratch_path.display());
    if !config.self_test {
        warn!("Startup I/O self-test disabled");
    }

    let addr = config.listen_addr();
    let state = AppState::new(config, env.var(ENV_API_KEY).map(String::from));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServiceError::Bind { addr, source })?;
    info!("Listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServiceError::Serve)?;

    info!("Application shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    info!("Shutdown signal received");
}
