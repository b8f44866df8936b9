//! cloudrun-kit CLI - Generate Cloud Run deployment artifacts
//!
//! This module contains the shared CLI implementation used by both binaries.

mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use cloudrun_kit_core::get_version;
use console::style;

/// Generate Cloud Run deployment artifacts
#[derive(Parser)]
#[command(name = "cloudrun-kit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Cloud Run deployment artifacts", long_about = None)]
#[command(after_help = get_banner())]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Increase verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render Dockerfile, main.tf, cloudbuild.yaml and the gcp/ scripts
    Generate(commands::GenerateArgs),
    /// Check gcp/gcp_constants.txt against the naming rules
    Validate(commands::ValidateArgs),
    /// Show the deployment constants
    Show(commands::ShowArgs),
    /// Smoke-test a running service
    Client(commands::ClientArgs),
}

/// Get the banner for help display
fn get_banner() -> &'static str {
    r#"
  gcp/gcp_constants.txt  ->  Dockerfile, main.tf, cloudbuild.yaml,
                             gcp/gcp_bootstrap.sh, gcp/gcp_show_commands.sh
"#
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Configure color output
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    logging::init_cli_logging(cli.verbose, cli.quiet)?;

    match cli.command {
        Some(Commands::Generate(args)) => commands::cmd_generate(&args, cli.quiet),
        Some(Commands::Validate(args)) => commands::cmd_validate(&args, cli.quiet),
        Some(Commands::Show(args)) => commands::cmd_show(&args, cli.quiet),
        Some(Commands::Client(args)) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(commands::cmd_client(&args, cli.quiet))
        }
        None => {
            // No command - show a welcome message and hint to use --help
            if !cli.quiet {
                println!(
                    "{} {}",
                    style("cloudrun-kit").cyan().bold(),
                    style(get_version()).dim()
                );
                println!();
                println!("Run {} for available commands.", style("--help").green());
            }
            Ok(())
        }
    }
}

/// Entry point for `cloudrun-kit-server`
pub fn run_server() -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(commands::cmd_serve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate_flags() {
        let cli =
            Cli::try_parse_from(["cloudrun-kit", "-vv", "generate", "--base-dir", "/work", "--dry-run"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Generate(args)) => {
                assert!(args.dry_run);
                assert_eq!(args.base_dir.as_deref(), Some(std::path::Path::new("/work")));
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn parses_show_json() {
        let cli = Cli::try_parse_from(["cloudrun-kit", "show", "--json", "-q"]).unwrap();
        assert!(cli.quiet);
        assert!(matches!(cli.command, Some(Commands::Show(ref a)) if a.json));
    }
}
