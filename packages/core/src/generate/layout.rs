//! Project directory layout expected by the generator
//!
//! ```text
//! <base>/
//!   gcp/gcp_constants.txt   deployment constants (input)
//!   gcp/packages.txt        OS packages for the runtime image (input)
//!   gcp/gcp_bootstrap.sh    generated
//!   gcp/gcp_show_commands.sh generated
//!   src/.env                container environment (input, may be empty)
//!   src/<APP_ENTRYPOINT>    service entry point (input)
//!   packages.txt            generated copy of gcp/packages.txt
//!   Dockerfile, main.tf, cloudbuild.yaml   generated
//! ```

use super::GenerateError;
use super::templates;
use std::path::{Path, PathBuf};

pub const GCP_DIR: &str = "gcp";
pub const SRC_DIR: &str = "src";
pub const CONSTANTS_FILE: &str = "gcp_constants.txt";
pub const DEPENDENCY_LIST_FILE: &str = "packages.txt";
pub const ENV_FILE: &str = ".env";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    base: PathBuf,
}

impl ProjectLayout {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    pub fn gcp_dir(&self) -> PathBuf {
        self.base.join(GCP_DIR)
    }

    pub fn src_dir(&self) -> PathBuf {
        self.base.join(SRC_DIR)
    }

    pub fn constants_path(&self) -> PathBuf {
        self.gcp_dir().join(CONSTANTS_FILE)
    }

    pub fn dependency_list_path(&self) -> PathBuf {
        self.gcp_dir().join(DEPENDENCY_LIST_FILE)
    }

    /// Where the container build step expects the dependency manifest
    pub fn dependency_manifest_path(&self) -> PathBuf {
        self.base.join(DEPENDENCY_LIST_FILE)
    }

    pub fn env_file_path(&self) -> PathBuf {
        self.src_dir().join(ENV_FILE)
    }

    pub fn entrypoint_path(&self, entrypoint: &str) -> PathBuf {
        self.src_dir().join(entrypoint)
    }

    pub fn dockerfile_path(&self) -> PathBuf {
        self.base.join(templates::DOCKERFILE)
    }

    pub fn terraform_path(&self) -> PathBuf {
        self.base.join(templates::TERRAFORM)
    }

    pub fn cloudbuild_path(&self) -> PathBuf {
        self.base.join(templates::CLOUDBUILD)
    }

    pub fn bootstrap_script_path(&self) -> PathBuf {
        self.gcp_dir().join(templates::BOOTSTRAP_SCRIPT)
    }

    pub fn show_commands_script_path(&self) -> PathBuf {
        self.gcp_dir().join(templates::SHOW_COMMANDS_SCRIPT)
    }

    /// Fail fast when a required directory or input file is missing
    ///
    /// An empty `.env` is fine; a missing one is not.
    pub fn check_preconditions(&self) -> Result<(), GenerateError> {
        for dir in [self.base.clone(), self.gcp_dir(), self.src_dir()] {
            if !dir.is_dir() {
                return Err(GenerateError::MissingDirectory(dir));
            }
        }

        let env_file = self.env_file_path();
        if !env_file.is_file() {
            return Err(GenerateError::MissingEnvFile(env_file));
        }

        for file in [self.constants_path(), self.dependency_list_path()] {
            if !file.is_file() {
                return Err(GenerateError::MissingFile(file));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scaffold(base: &Path) {
        fs::create_dir_all(base.join(GCP_DIR)).unwrap();
        fs::create_dir_all(base.join(SRC_DIR)).unwrap();
        fs::write(base.join(GCP_DIR).join(CONSTANTS_FILE), "").unwrap();
        fs::write(base.join(GCP_DIR).join(DEPENDENCY_LIST_FILE), "").unwrap();
        fs::write(base.join(SRC_DIR).join(ENV_FILE), "").unwrap();
    }

    #[test]
    fn test_complete_layout_passes() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        ProjectLayout::new(dir.path()).check_preconditions().unwrap();
    }

    #[test]
    fn test_missing_src_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(GCP_DIR)).unwrap();
        let err = ProjectLayout::new(dir.path())
            .check_preconditions()
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingDirectory(p) if p.ends_with(SRC_DIR)));
    }

    #[test]
    fn test_missing_env_file() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        fs::remove_file(dir.path().join(SRC_DIR).join(ENV_FILE)).unwrap();
        let err = ProjectLayout::new(dir.path())
            .check_preconditions()
            .unwrap_err();
        assert!(matches!(err, GenerateError::MissingEnvFile(_)));
    }

    #[test]
    fn test_missing_dependency_list() {
        let dir = tempfile::tempdir().unwrap();
        scaffold(dir.path());
        fs::remove_file(dir.path().join(GCP_DIR).join(DEPENDENCY_LIST_FILE)).unwrap();
        let err = ProjectLayout::new(dir.path())
            .check_preconditions()
            .unwrap_err();
        assert!(
            matches!(err, GenerateError::MissingFile(p) if p.ends_with(DEPENDENCY_LIST_FILE))
        );
    }

    #[test]
    fn test_artifact_paths() {
        let layout = ProjectLayout::new("/work");
        assert_eq!(layout.dockerfile_path(), Path::new("/work/Dockerfile"));
        assert_eq!(
            layout.bootstrap_script_path(),
            Path::new("/work/gcp/gcp_bootstrap.sh")
        );
        assert_eq!(
            layout.dependency_manifest_path(),
            Path::new("/work/packages.txt")
        );
    }
}
