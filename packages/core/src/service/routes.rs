//! HTTP handlers for the template service
//!
//! Routes:
//! - GET /healthz - liveness, always 200
//! - GET /readyz - 200 once the readiness gate is open
//! - GET /ready - Cloud Run startup probe, opens the gate
//! - GET / - status summary
//! - POST /api/calculator - toy calculator

use super::config::ServiceConfig;
use super::readiness::{ProbeError, ProbeOutcome, ReadinessGate};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Shared state handed to every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub gate: Arc<ReadinessGate>,
    /// Captured from `OPENAI_API_KEY` at startup
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn new(config: ServiceConfig, api_key: Option<String>) -> Self {
        let gate = ReadinessGate::from_config(&config);
        Self {
            config: Arc::new(config),
            gate: Arc::new(gate),
            api_key: api_key.map(Arc::from),
        }
    }
}

/// Build the router with all endpoints mounted
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(liveness))
        .route("/readyz", get(readiness))
        .route("/ready", get(startup_probe))
        .route("/", get(root))
        .route("/api/calculator", post(calculate))
        .with_state(state)
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            message: None,
        }
    }

    fn ok(message: &str) -> Self {
        Self {
            status: "ok".to_string(),
            message: Some(message.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetailResponse {
    detail: &'static str,
}

fn default_operation() -> String {
    "add".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalculatorInput {
    pub num1: f64,
    pub num2: f64,
    #[serde(default = "default_operation")]
    pub operation: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct CalculatorOutput {
    pub result: f64,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /healthz
async fn liveness() -> Json<StatusResponse> {
    Json(StatusResponse::new("alive"))
}

/// GET /readyz
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.gate.is_ready() {
        Ok(Json(StatusResponse::new("ready")))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(DetailResponse {
                detail: "Service initializing",
            }),
        ))
    }
}

/// GET /ready
async fn startup_probe(State(state): State<AppState>) -> Result<Json<StatusResponse>, ProbeError> {
    let message = match state.gate.probe().await? {
        ProbeOutcome::AlreadyReady => "FUSE mount and probe confirmed ready.",
        ProbeOutcome::BecameReady => "FUSE mount ready, application is starting up.",
    };
    Ok(Json(StatusResponse::ok(message)))
}

/// Last four characters only, e.g. `sk-...a1B2`
pub fn mask_api_key(key: &str) -> String {
    let tail: String = key
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();
    format!("sk-...{tail}")
}

/// GET /
async fn root(State(state): State<AppState>) -> Json<StatusResponse> {
    info!("Mount path: {}", state.config.mount_path.display());

    match state.api_key.as_deref() {
        Some(key) => {
            info!("OpenAI API key is set: {}", mask_api_key(key));
            Json(StatusResponse::ok("Server is running."))
        }
        None => {
            error!("OPENAI_API_KEY not set. Add it to the Cloud Run environment variables.");
            Json(StatusResponse::ok(
                "Server is running, BUT OPENAI_API_KEY not found!.",
            ))
        }
    }
}

/// POST /api/calculator
///
/// Only `add` is supported; any other operation falls back to addition.
async fn calculate(Json(input): Json<CalculatorInput>) -> Json<CalculatorOutput> {
    let CalculatorInput {
        num1,
        num2,
        operation,
    } = input;

    let message = if operation == "add" {
        format!("Successfully calculated the sum of {num1:?} and {num2:?}.")
    } else {
        format!("Operation '{operation}' not supported. Defaulting to addition.")
    };

    Json(CalculatorOutput {
        result: num1 + num2,
        message,
    })
}
