//! Logger setup for the command line.
//!
//! Messages go to stderr as `LEVEL message`, filtered by `-v`/`-q` unless
//! `RUST_LOG` says otherwise.

use std::io::IsTerminal;

use color_eyre::eyre::{Result, eyre};
use tracing_subscriber::EnvFilter;

/// Filter directive for the given verbosity flags.
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    }
}

/// Install the process-wide subscriber. Call once, before any scanning.
pub fn init(verbose: u8, quiet: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose, quiet)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {e}"))
}
