//! Deployment artifact generator
//!
//! This module turns a project's `gcp/gcp_constants.txt` into everything needed
//! to stand up the service on Cloud Run:
//! - `Dockerfile` for the container image
//! - `main.tf` for the bucket and BigQuery dataset
//! - `cloudbuild.yaml` for build, push and deploy
//! - `gcp/gcp_bootstrap.sh` for the one-time project bootstrap
//! - `gcp/gcp_show_commands.sh` with handy follow-up commands

mod artifacts;
mod context;
pub mod dockerfile;
mod error;
pub mod layout;
pub mod templates;
pub mod version;

pub use artifacts::{copy_dependency_manifest, write_artifact};
pub use context::DeploymentContext;
pub use error::GenerateError;
pub use layout::ProjectLayout;
pub use templates::TemplateRenderer;
pub use version::{entry_module_name, get_app_version};

use crate::config::schema::KEY_ENTRYPOINT;
use crate::config::{load_constants, load_env_file, validate_constants};
use std::path::PathBuf;
use tracing::{debug, info};

/// Options for a generator run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Render everything but write only the dependency manifest
    pub dry_run: bool,
}

/// Outcome of a successful generator run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateReport {
    pub app_version: String,
    pub entry_module: String,
    /// Artifact paths in render order (written, or would be written on a dry run)
    pub artifacts: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Render all artifacts for the project at `layout`
///
/// Steps run in a fixed order and the first failure aborts the rest. The
/// dependency manifest is copied before validation, so it is refreshed even
/// when the constants are rejected.
pub fn generate_files(
    layout: &ProjectLayout,
    options: &GenerateOptions,
) -> Result<GenerateReport, GenerateError> {
    layout.check_preconditions()?;

    copy_dependency_manifest(
        &layout.dependency_list_path(),
        &layout.dependency_manifest_path(),
    )?;

    let constants = load_constants(&layout.constants_path())?;
    validate_constants(&constants).map_err(GenerateError::Invalid)?;
    let env_vars = load_env_file(&layout.env_file_path())?;

    let entrypoint = constants
        .entrypoint()
        .ok_or_else(|| GenerateError::MissingKey(KEY_ENTRYPOINT.to_string()))?;
    let entrypoint_path = layout.entrypoint_path(entrypoint);
    if !entrypoint_path.is_file() {
        return Err(GenerateError::MissingEntryPoint {
            name: entrypoint.to_string(),
            path: entrypoint_path,
        });
    }
    let entry_module = entry_module_name(entrypoint).to_string();
    let app_version = get_app_version(&entrypoint_path);
    info!("Detected {entry_module} version {app_version}");

    let context = DeploymentContext::new(&constants, &env_vars, &entry_module, &app_version)?
        .to_tera()?;
    let renderer = TemplateRenderer::from_embedded()?;

    let targets = [
        (templates::DOCKERFILE, layout.dockerfile_path()),
        (templates::TERRAFORM, layout.terraform_path()),
        (templates::CLOUDBUILD, layout.cloudbuild_path()),
        (templates::BOOTSTRAP_SCRIPT, layout.bootstrap_script_path()),
        (templates::SHOW_COMMANDS_SCRIPT, layout.show_commands_script_path()),
    ];

    // Render everything before touching the filesystem
    let rendered = targets
        .into_iter()
        .map(|(name, path)| Ok((path, renderer.render(name, &context)?)))
        .collect::<Result<Vec<_>, GenerateError>>()?;

    let mut artifacts = Vec::with_capacity(rendered.len());
    for (path, contents) in rendered {
        if options.dry_run {
            debug!("Dry run, skipping {}", path.display());
        } else if !write_artifact(&path, &contents) {
            return Err(GenerateError::WriteFailed(path));
        }
        artifacts.push(path);
    }

    Ok(GenerateReport {
        app_version,
        entry_module,
        artifacts,
        dry_run: options.dry_run,
    })
}
