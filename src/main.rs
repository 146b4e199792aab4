//! dirscan - scan a directory tree and save per-entry metadata as JSON.
//!
//! Usage:
//!   dirscan --dir PATH --out FILE       Scan PATH three levels deep into FILE
//!   dirscan --dir PATH --depth 1 ...    Only the files directly inside PATH
//!   dirscan                             Ask for the directory and output file
//!   dirscan --version                   Show version

mod logging;
mod progress;
mod resolve;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use color_eyre::eyre::{Context, Result};
use tracing::{error, info, warn};

use dirscan_core::{DEFAULT_DEPTH, ScanConfig, ScanError, ScanResult};
use dirscan_export::{JsonExporter, WriteMode};
use dirscan_scan::TreeScanner;

use crate::progress::ProgressRenderer;
use crate::resolve::PathResolver;

#[derive(Parser)]
#[command(
    name = "dirscan",
    version,
    about = "Scan a directory and save file info (including BLAKE3 hash) to a JSON file",
    long_about = "dirscan records size, timestamps and a BLAKE3 content hash for every file \
                  and aggregate counts for every directory, down to a fixed depth, and saves \
                  the result as indented JSON.\n\n\
                  When --dir or --out is omitted you are asked for it interactively."
)]
struct Cli {
    /// Directory to scan
    #[arg(short, long, value_name = "PATH")]
    dir: Option<PathBuf>,

    /// Path to save the output JSON file
    #[arg(short, long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Depth of directory scanning (1 = only files directly inside the directory)
    #[arg(long, default_value_t = DEFAULT_DEPTH, value_parser = clap::value_parser!(u32).range(1..))]
    depth: u32,

    /// Follow symbolic links (loops are detected and skipped)
    #[arg(long)]
    follow_symlinks: bool,

    /// Ignore entries whose name starts with a dot
    #[arg(long)]
    skip_hidden: bool,

    /// Write through a temporary file and rename it into place
    #[arg(long)]
    atomic: bool,

    /// Do not show the progress line
    #[arg(long)]
    no_progress: bool,

    /// Never prompt; a missing --dir or --out ends the run without output
    #[arg(long)]
    no_interactive: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, conflicts_with = "quiet")]
    verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet)?;

    let resolver = resolve::default_resolver(!cli.no_interactive);

    let Some(directory) = resolve::explicit_or(cli.dir.clone(), || resolver.pick_directory())? else {
        info!("No directory selected. Exiting.");
        return Ok(ExitCode::SUCCESS);
    };

    let Some(output) = resolve::explicit_or(cli.out.clone(), || resolver.pick_output())? else {
        info!("No output file selected. Exiting.");
        return Ok(ExitCode::SUCCESS);
    };

    let config = ScanConfig::builder()
        .root(directory)
        .max_depth(cli.depth)
        .follow_symlinks(cli.follow_symlinks)
        .include_hidden(!cli.skip_hidden)
        .build()
        .context("Invalid scan settings")?;

    let result = match run_scan(&config, !cli.no_progress) {
        Ok(result) => result,
        Err(
            err @ (ScanError::NotADirectory { .. }
            | ScanError::NotFound { .. }
            | ScanError::PermissionDenied { .. }),
        ) => {
            error!("{err}");
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err).context("Scan failed"),
    };

    let mode = if cli.atomic {
        WriteMode::Atomic
    } else {
        WriteMode::Direct
    };
    JsonExporter::new()
        .with_mode(mode)
        .write(&result.tree, &output)
        .with_context(|| format!("Failed to save scan to {}", output.display()))?;

    log_summary(&result);
    info!("Scan complete. Data saved to: {}", output.display());

    Ok(ExitCode::SUCCESS)
}

/// Run the scan, drawing progress on stderr when it is a terminal.
fn run_scan(config: &ScanConfig, show_progress: bool) -> Result<ScanResult, ScanError> {
    let scanner = TreeScanner::new();

    let renderer = (show_progress && std::io::stderr().is_terminal())
        .then(|| ProgressRenderer::spawn(scanner.subscribe()));

    let result = scanner.scan(config);

    // Dropping the scanner closes the channel so the renderer can exit.
    drop(scanner);
    if let Some(renderer) = renderer {
        renderer.finish();
    }

    result
}

fn log_summary(result: &ScanResult) {
    let stats = &result.stats;
    info!(
        "Scanned {}: {} files, {} directories, {} in {:.2}s",
        result.root_path.display(),
        stats.total_files,
        stats.total_dirs,
        progress::format_size(stats.total_size),
        result.scan_duration.as_secs_f64()
    );

    if stats.unhashed_files > 0 {
        warn!("{} file(s) could not be read and have no hash", stats.unhashed_files);
    }
    if result.has_warnings() {
        warn!("{} warning(s) during scan", result.warnings.len());
    }
}
