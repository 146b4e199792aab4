//! Single-line progress display on stderr.

use std::io::Write;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tokio::sync::broadcast::{self, error::RecvError};

use dirscan_scan::ScanProgress;

/// Minimum time between two redraws.
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Widest path tail shown on the progress line.
const MAX_PATH_WIDTH: usize = 50;

/// Draws scanner progress from a background thread until the scanner
/// closes its channel.
pub struct ProgressRenderer {
    handle: JoinHandle<()>,
}

impl ProgressRenderer {
    /// Start rendering updates from `rx`.
    pub fn spawn(mut rx: broadcast::Receiver<ScanProgress>) -> Self {
        let handle = thread::spawn(move || {
            let mut stderr = std::io::stderr();
            let mut last_draw: Option<Instant> = None;
            let mut drew = false;

            loop {
                match rx.blocking_recv() {
                    Ok(progress) => {
                        if last_draw.is_some_and(|t| t.elapsed() < REDRAW_INTERVAL) {
                            continue;
                        }
                        let _ = write!(stderr, "\r\x1b[2K{}", render_line(&progress));
                        let _ = stderr.flush();
                        last_draw = Some(Instant::now());
                        drew = true;
                    }
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                }
            }

            if drew {
                let _ = write!(stderr, "\r\x1b[2K");
                let _ = stderr.flush();
            }
        });

        Self { handle }
    }

    /// Wait for the renderer to clear its line and exit.
    pub fn finish(self) {
        let _ = self.handle.join();
    }
}

/// Text of one progress line.
pub fn render_line(progress: &ScanProgress) -> String {
    let mut line = format!(
        "Scanning: {} files, {} dirs, {}",
        progress.files_scanned,
        progress.dirs_scanned,
        format_size(progress.bytes_scanned)
    );
    if progress.errors_count > 0 {
        line.push_str(&format!(", {} warnings", progress.errors_count));
    }

    let path = progress.current_path.to_string_lossy();
    if !path.is_empty() {
        line.push_str(" | ");
        line.push_str(&truncate_start(&path, MAX_PATH_WIDTH));
    }
    line
}

/// Format size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Keep the last `max_chars` characters, marking the cut with an ellipsis.
fn truncate_start(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        s.to_string()
    } else {
        let tail: String = s.chars().skip(count - (max_chars - 1)).collect();
        format!("…{tail}")
    }
}
