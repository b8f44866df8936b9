//! Artifact file output
//!
//! Writing never propagates an error: failures are logged and reported as a
//! `false` status that the caller must check.

use super::GenerateError;
use std::fs;
use std::path::Path;
use tracing::{debug, error};

/// Write an artifact, replacing any existing file
///
/// Returns `false` if the old file cannot be removed or the new one cannot be
/// written.
pub fn write_artifact(path: &Path, contents: &str) -> bool {
    if path.is_file()
        && let Err(e) = fs::remove_file(path)
    {
        error!("Failed to remove existing {}: {e}", path.display());
        return false;
    }

    match fs::write(path, contents) {
        Ok(()) => {
            debug!("Wrote {} ({} bytes)", path.display(), contents.len());
            true
        }
        Err(e) => {
            error!("Failed to write {}: {e}", path.display());
            false
        }
    }
}

/// Publish the dependency list where the container build expects it
///
/// The destination is a byte-for-byte copy of the source.
pub fn copy_dependency_manifest(source: &Path, destination: &Path) -> Result<(), GenerateError> {
    let contents = fs::read(source).map_err(|e| GenerateError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    fs::write(destination, &contents).map_err(|e| GenerateError::Io {
        path: destination.to_path_buf(),
        source: e,
    })?;
    debug!(
        "Copied {} to {} ({} bytes)",
        source.display(),
        destination.display(),
        contents.len()
    );
    Ok(())
}
