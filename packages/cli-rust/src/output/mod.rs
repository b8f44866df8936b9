//! Output utilities for CLI commands
//!
//! Styled error formatting and small helpers shared by the subcommands.

pub mod errors;

pub use errors::{format_generate_error, show_generate_error};
