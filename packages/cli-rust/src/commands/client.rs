//! Client command implementation
//!
//! Smoke-tests a deployed service: checks liveness, then exercises the
//! calculator with one supported and one unsupported operation.

use anyhow::{Result, anyhow};
use clap::Args;
use cloudrun_kit_core::service::{CalculatorInput, CalculatorOutput};
use console::style;
use std::time::Duration;
use tracing::debug;

const STATUS_TIMEOUT: Duration = Duration::from_secs(2);

/// Arguments for the client command
#[derive(Args)]
pub struct ClientArgs {
    /// Service URL, e.g. the Cloud Run URL printed by gcp_bootstrap.sh
    #[arg(long, value_name = "URL", default_value = "http://localhost:8080")]
    pub base_url: String,
}

/// True when `GET /healthz` answers 200
pub async fn check_server_status(client: &reqwest::Client, base_url: &str) -> bool {
    let url = format!("{base_url}/healthz");
    match client.get(&url).timeout(STATUS_TIMEOUT).send().await {
        Ok(response) if response.status().is_success() => true,
        Ok(response) => {
            debug!("{url} answered {}", response.status());
            false
        }
        Err(e) => {
            debug!("{url} unreachable: {e}");
            false
        }
    }
}

/// Call `POST /api/calculator`
pub async fn run_calculator(
    client: &reqwest::Client,
    base_url: &str,
    num1: f64,
    num2: f64,
    operation: &str,
) -> Result<CalculatorOutput> {
    let input = CalculatorInput {
        num1,
        num2,
        operation: operation.to_string(),
    };
    let response = client
        .post(format!("{base_url}/api/calculator"))
        .json(&input)
        .send()
        .await
        .map_err(|e| anyhow!("Calculator request failed: {e}"))?
        .error_for_status()
        .map_err(|e| anyhow!("Calculator returned an error: {e}"))?;

    response
        .json::<CalculatorOutput>()
        .await
        .map_err(|e| anyhow!("Failed to decode calculator response: {e}"))
}

pub async fn cmd_client(args: &ClientArgs, quiet: bool) -> Result<()> {
    let base_url = args.base_url.trim_end_matches('/');
    let client = reqwest::Client::new();

    if !check_server_status(&client, base_url).await {
        return Err(anyhow!("Server is OFFLINE at {base_url}"));
    }
    if !quiet {
        println!("{} {}", style("Server is ONLINE:").green().bold(), base_url);
    }

    for (num1, num2, operation) in [(5.5, 10.2, "add"), (10.0, 3.0, "multiply")] {
        if !quiet {
            println!();
            println!("{} {}", style("Executing:").cyan(), operation);
        }
        let output = run_calculator(&client, base_url, num1, num2, operation).await?;
        if !quiet {
            println!("  {} {}", style("Message:").dim(), output.message);
            println!("  {} {}", style("Result:").dim(), output.result);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudrun_kit_core::{AppState, ServiceConfig, router};
    use std::path::PathBuf;

    async fn spawn_server() -> String {
        let config = ServiceConfig {
            llm_provider: "openai".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            max_step_iterations: 3,
            mount_path: PathBuf::from("/nonexistent"),
            scratch_path: PathBuf::from("/nonexistent"),
            self_test: false,
            port: 0,
            deployed_version: None,
        };
        let app = router(AppState::new(config, None));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn client_talks_to_router() {
        let base_url = spawn_server().await;
        let client = reqwest::Client::new();

        assert!(check_server_status(&client, &base_url).await);

        let added = run_calculator(&client, &base_url, 5.5, 10.2, "add")
            .await
            .unwrap();
        assert!((added.result - 15.7).abs() < 1e-9);
        assert_eq!(
            added.message,
            "Successfully calculated the sum of 5.5 and 10.2."
        );

        let multiplied = run_calculator(&client, &base_url, 10.0, 3.0, "multiply")
            .await
            .unwrap();
        assert_eq!(multiplied.result, 13.0);
    }

    #[tokio::test]
    async fn offline_server_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = reqwest::Client::new();
        assert!(!check_server_status(&client, &format!("http://{addr}")).await);
    }
}
