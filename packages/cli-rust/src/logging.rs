//! Tracing subscriber setup for both binaries
//!
//! The operator CLI logs compactly to stderr so stdout stays clean for command
//! output. The server logs to stdout, which Cloud Run forwards to Cloud Logging.

use anyhow::{Result, anyhow};
use std::str::FromStr;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected text or json)")),
        }
    }
}

/// Filter directive for the CLI's `-v` / `-q` flags
pub fn cli_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// CLI logging: compact, stderr, `RUST_LOG` overrides the flags
pub fn init_cli_logging(verbose: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli_level(verbose, quiet)));
    let fmt_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(console::colors_enabled_stderr());

    init_subscriber(tracing_subscriber::registry().with(filter).with(fmt_layer))
}

/// Map `LOG_LEVEL` onto a tracing level
///
/// Accepts the usual Python/Cloud Logging spellings (`WARNING`, `CRITICAL`).
/// Anything that is not a level falls back to `info`.
pub fn server_level(level: Option<&str>) -> &'static str {
    match level.map(|l| l.trim().to_ascii_lowercase()).as_deref() {
        Some("trace") => "trace",
        Some("debug") => "debug",
        Some("warn" | "warning") => "warn",
        Some("error" | "critical" | "fatal") => "error",
        Some("off") => "off",
        _ => "info",
    }
}

/// Server logging: stdout, level from `LOG_LEVEL`, format from `LOG_FORMAT`
pub fn init_server_logging(level: Option<&str>, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::new(server_level(level));

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(false);
            init_subscriber(tracing_subscriber::registry().with(filter).with(fmt_layer))
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_current_span(false);
            init_subscriber(tracing_subscriber::registry().with(filter).with(fmt_layer))
        }
    }
}

fn init_subscriber<S>(subscriber: S) -> Result<()>
where
    S: Subscriber + Send + Sync + 'static,
{
    subscriber
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
