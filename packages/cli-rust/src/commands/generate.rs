//! Generate command implementation
//!
//! Renders the Dockerfile, terraform, Cloud Build and bootstrap scripts from
//! `gcp/gcp_constants.txt`.

use crate::output::show_generate_error;
use anyhow::{Result, anyhow};
use clap::Args;
use cloudrun_kit_core::{GenerateOptions, ProjectLayout, generate_files};
use console::style;
use std::path::{Path, PathBuf};

/// Arguments for the generate command
#[derive(Args)]
pub struct GenerateArgs {
    /// Project root containing gcp/ and src/ (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub base_dir: Option<PathBuf>,

    /// Validate and render without writing artifacts
    #[arg(long)]
    pub dry_run: bool,
}

/// Resolve the project root from `--base-dir`
pub fn resolve_layout(base_dir: Option<&Path>) -> Result<ProjectLayout> {
    let base = match base_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()?,
    };
    Ok(ProjectLayout::new(base))
}

/// Generate deployment artifacts
///
/// This command:
/// 1. Checks the project layout
/// 2. Publishes gcp/packages.txt as the container dependency manifest
/// 3. Validates the constants (all violations are reported)
/// 4. Renders and writes the five artifacts
pub fn cmd_generate(args: &GenerateArgs, quiet: bool) -> Result<()> {
    let layout = resolve_layout(args.base_dir.as_deref())?;
    let options = GenerateOptions {
        dry_run: args.dry_run,
    };

    let report = match generate_files(&layout, &options) {
        Ok(report) => report,
        Err(e) => {
            show_generate_error(&e);
            return Err(anyhow!("Artifact generation failed"));
        }
    };

    if quiet {
        return Ok(());
    }

    println!(
        "{} {} {}",
        style("Entry point:").dim(),
        style(&report.entry_module).cyan(),
        style(format!("v{}", report.app_version)).dim()
    );
    let verb = if report.dry_run { "Would write" } else { "Wrote" };
    for path in &report.artifacts {
        let shown = path.strip_prefix(layout.base_dir()).unwrap_or(path);
        println!("  {} {}", style(verb).green(), shown.display());
    }
    println!();
    if report.dry_run {
        println!("{}", style("Dry run complete, no artifacts written.").yellow());
    } else {
        println!(
            "{} Next: run {}",
            style("Success:").green().bold(),
            style("gcp/gcp_bootstrap.sh").cyan()
        );
    }

    Ok(())
}
