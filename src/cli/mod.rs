//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod generate;
mod list;

use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::config::{load_config, merge_cli_overrides, CliOverrides, PxsheetConfig};

pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// pxsheet - Render 8-direction sprite definitions into PNG sprite sheets
#[derive(Parser)]
#[command(name = "pxsheet")]
#[command(about = "Render 8-direction sprite definitions into PNG sprite sheets")]
#[command(version)]
pub struct Cli {
    /// Increase log output (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate sprite sheets from definitions
    Generate {
        /// Only generate the sprite with this name
        name: Option<String>,

        /// Directory containing sprite definitions
        #[arg(long)]
        src: Option<PathBuf>,

        /// Output directory for sheets
        #[arg(long)]
        out: Option<PathBuf>,

        /// Path to pxsheet.toml (default: search upwards from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Don't write <name>.json metadata sidecars
        #[arg(long)]
        no_metadata: bool,

        /// zlib compression level, 0 (fastest) to 9 (smallest)
        #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
        compression: Option<u32>,
    },

    /// List the sprite definitions that would be generated
    List {
        /// Directory containing sprite definitions
        #[arg(long)]
        src: Option<PathBuf>,

        /// Path to pxsheet.toml (default: search upwards from the current directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Run the CLI and return the process exit code
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { name, src, out, config, no_metadata, compression } => {
            let overrides = CliOverrides { src, out, no_metadata, compression };
            match resolve_config(config.as_deref(), &overrides) {
                Ok(cfg) => generate::run_generate(&cfg, name),
                Err(code) => code,
            }
        }
        Commands::List { src, config } => {
            let overrides = CliOverrides { src, ..Default::default() };
            match resolve_config(config.as_deref(), &overrides) {
                Ok(cfg) => list::run_list(&cfg),
                Err(code) => code,
            }
        }
    }
}

/// Log to stderr. `RUST_LOG` wins over the verbosity flag when set.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pxsheet={}", default_level)));

    // A second init (e.g. from an embedding program) is not an error
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load the project config and apply command-line overrides.
fn resolve_config(path: Option<&Path>, overrides: &CliOverrides) -> Result<PxsheetConfig, ExitCode> {
    let mut config = load_config(path).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    merge_cli_overrides(&mut config, overrides).map_err(|e| {
        eprintln!("Error: {}", e);
        ExitCode::from(EXIT_INVALID_ARGS)
    })?;
    Ok(config)
}
