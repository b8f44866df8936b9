//! CLI command implementations
//!
//! Generator commands (`generate`, `validate`, `show`), the deployed-service
//! smoke test (`client`), and the service runner used by `cloudrun-kit-server`.

mod client;
mod generate;
mod serve;
mod show;
mod validate;

pub use client::{ClientArgs, cmd_client};
pub use generate::{GenerateArgs, cmd_generate};
pub use serve::cmd_serve;
pub use show::{ShowArgs, cmd_show};
pub use validate::{ValidateArgs, cmd_validate};
