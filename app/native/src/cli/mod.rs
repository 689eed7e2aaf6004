//! CLI module for `CarrotPlay`.
//!
//! This module provides the command-line interface used to inspect
//! capabilities, launch apps onto displays, inject input and manage the
//! configuration file on a rooted head unit.

mod commands;
pub mod context;
mod output;

use clap::Parser;
pub use commands::Cli;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::error::CarrotError;

/// Filter used when `RUST_LOG` is unset.
const DEFAULT_FILTER: &str = "carrotplay=info,carrotplay_lib=info";

/// Filter used with `--verbose` when `RUST_LOG` is unset.
const VERBOSE_FILTER: &str = "carrotplay=debug,carrotplay_lib=debug";

/// Builds the log filter: `RUST_LOG` first, then the verbosity default.
fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }))
}

/// Installs the stderr log subscriber. Later calls are no-ops.
fn init_tracing(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(verbose))
        .try_init();
}

/// Runs the CLI.
///
/// Parses command-line arguments and executes the appropriate command.
///
/// # Errors
///
/// Returns an error if the command execution fails.
pub fn run() -> Result<(), CarrotError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute()
}
