//! Generator error types

use crate::config::{ConfigError, ValidationError};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an artifact generation run
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),

    #[error("Required file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// `src/.env` must exist even when it holds no variables
    #[error("Environment file not found: {} (create an empty file if no variables are needed)", .0.display())]
    MissingEnvFile(PathBuf),

    #[error("Missing constant: {0}")]
    MissingKey(String),

    #[error("Entry point {name} not found at {}", path.display())]
    MissingEntryPoint { name: String, path: PathBuf },

    #[error("{} constant(s) failed validation", .0.len())]
    Invalid(Vec<ValidationError>),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: tera::Error,
    },

    #[error("Failed to write {}", .0.display())]
    WriteFailed(PathBuf),
}
