//! Validate command implementation
//!
//! Checks `gcp/gcp_constants.txt` against the naming rules without generating.

use super::generate::resolve_layout;
use anyhow::{Context, Result, anyhow};
use clap::Args;
use cloudrun_kit_core::{display_validation_errors, load_constants, validate_constants};
use console::style;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Args)]
pub struct ValidateArgs {
    /// Project root containing gcp/ (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,
}

pub fn cmd_validate(args: &ValidateArgs, quiet: bool) -> Result<()> {
    let layout = resolve_layout(args.base_dir.as_deref())?;
    let path = layout.constants_path();
    let constants = load_constants(&path)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    if let Err(errors) = validate_constants(&constants) {
        display_validation_errors(&errors);
        return Err(anyhow!("{} constant(s) failed validation", errors.len()));
    }

    if !quiet {
        println!(
            "{} {} ({} constants)",
            style("Valid:").green().bold(),
            path.display(),
            constants.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::generate::tests::{CONSTANTS, project};

    fn args_for(dir: &tempfile::TempDir) -> ValidateArgs {
        ValidateArgs {
            base_dir: Some(dir.path().to_path_buf()),
        }
    }

    #[test]
    fn test_cmd_validate_accepts_valid_constants() {
        let dir = project(CONSTANTS);
        cmd_validate(&args_for(&dir), true).unwrap();
    }

    #[test]
    fn test_cmd_validate_counts_every_violation() {
        let broken = CONSTANTS
            .replace("GCP_PROJ_ID=my-proj-1", "GCP_PROJ_ID=My-Project")
            .replace("GCP_REPOSITORY=my-repo", "GCP_REPOSITORY=-repo");
        let dir = project(&broken);

        let err = cmd_validate(&args_for(&dir), true).unwrap_err();
        assert_eq!(err.to_string(), "2 constant(s) failed validation");
    }

    #[test]
    fn test_cmd_validate_missing_constants_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = cmd_validate(&args_for(&dir), true).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load"));
    }
}
