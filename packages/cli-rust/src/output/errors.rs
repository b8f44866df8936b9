//! Centralized generator error formatting
//!
//! Gives operator-facing errors a consistent shape: a red headline, the
//! details, and what to do about it.

use cloudrun_kit_core::config::ConfigError;
use cloudrun_kit_core::{GenerateError, display_validation_errors};
use console::style;

/// Format generator errors with actionable guidance
pub fn format_generate_error(e: &GenerateError) -> String {
    match e {
        GenerateError::MissingDirectory(path) => format!(
            "{}\n\n  {}\n  {}",
            style("Project directory incomplete").red().bold(),
            style(path.display()).yellow(),
            style("  Run from the project root, or pass --base-dir <DIR>").cyan()
        ),
        GenerateError::MissingFile(path) | GenerateError::Config(ConfigError::NotFound(path)) => {
            format!(
                "{}\n\n  {}\n  {}",
                style("Required file not found").red().bold(),
                style(path.display()).yellow(),
                style("  Create it before running the generator").cyan()
            )
        }
        GenerateError::MissingEnvFile(path) => format!(
            "{}\n\n  {}\n  {}",
            style("Environment file not found").red().bold(),
            style(path.display()).yellow(),
            style(format!("  touch {}", path.display())).cyan()
        ),
        GenerateError::MissingKey(key) => format!(
            "{}\n\n  {}\n  {}",
            style("Missing constant").red().bold(),
            key,
            style(format!("  Add {key}=... to gcp/gcp_constants.txt")).cyan()
        ),
        GenerateError::MissingEntryPoint { name, path } => format!(
            "{}\n\n  {} {}\n  {}",
            style("Entry point not found").red().bold(),
            name,
            style(format!("(expected at {})", path.display())).dim(),
            style("  Check APP_ENTRYPOINT in gcp/gcp_constants.txt").cyan()
        ),
        GenerateError::Invalid(errors) => format!(
            "{}",
            style(format!("{} constant(s) failed validation", errors.len()))
                .red()
                .bold()
        ),
        GenerateError::WriteFailed(path) => format!(
            "{}\n\n  {}\n  {}",
            style("Failed to write artifact").red().bold(),
            style(path.display()).yellow(),
            style("  Check permissions on the project directory; see the log above").cyan()
        ),
        _ => e.to_string(),
    }
}

/// Show a generator error on stderr
///
/// Validation failures are listed field by field before the summary.
pub fn show_generate_error(e: &GenerateError) {
    if let GenerateError::Invalid(errors) = e {
        display_validation_errors(errors);
    }
    eprintln!();
    eprintln!("{}", format_generate_error(e));
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudrun_kit_core::ValidationError;
    use std::path::PathBuf;

    #[test]
    fn format_missing_env_file_suggests_touch() {
        let error = GenerateError::MissingEnvFile(PathBuf::from("src/.env"));
        let msg = format_generate_error(&error);
        assert!(msg.contains("Environment file not found"));
        assert!(msg.contains("touch src/.env"));
    }

    #[test]
    fn format_missing_key_names_the_key() {
        let error = GenerateError::MissingKey("GCP_IMAGE".to_string());
        let msg = format_generate_error(&error);
        assert!(msg.contains("GCP_IMAGE=..."));
    }

    #[test]
    fn format_config_not_found_shows_path() {
        let error = GenerateError::Config(ConfigError::NotFound(PathBuf::from(
            "gcp/gcp_constants.txt",
        )));
        let msg = format_generate_error(&error);
        assert!(msg.contains("Required file not found"));
        assert!(msg.contains("gcp/gcp_constants.txt"));
    }

    #[test]
    fn format_invalid_counts_errors() {
        let error = GenerateError::Invalid(vec![ValidationError {
            field: "GCP_BQ_DATASET_ID".to_string(),
            message: "Invalid".to_string(),
            hint: "ds_main".to_string(),
        }]);
        assert!(format_generate_error(&error).contains("1 constant(s) failed validation"));
    }
}
