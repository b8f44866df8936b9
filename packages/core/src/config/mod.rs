//! Deployment constants loading and validation
//!
//! The constants file (`gcp/gcp_constants.txt`) and the container `.env` file
//! share one flat `KEY=VALUE` format.

mod loader;
pub mod schema;
mod validation;

pub use loader::{ConfigError, load_constants, load_env_file, parse_env_lines, parse_key_values};
pub use schema::{ConfigMap, EnvVarList};
pub use validation::{ValidationError, display_validation_errors, validate_constants};
