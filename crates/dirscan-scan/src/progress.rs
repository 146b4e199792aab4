//! Scan progress reporting.

use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Progress information during a scan.
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Number of files recorded so far.
    pub files_scanned: u64,
    /// Number of directories recorded so far.
    pub dirs_scanned: u64,
    /// Total bytes of recorded files.
    pub bytes_scanned: u64,
    /// Current path being scanned.
    pub current_path: PathBuf,
    /// Number of warnings encountered.
    pub errors_count: u64,
    /// Time elapsed since scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Create initial progress state.
    pub fn new() -> Self {
        Self {
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            current_path: PathBuf::new(),
            errors_count: 0,
            elapsed: Duration::ZERO,
        }
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Running counters for one scan, snapshotted into [`ScanProgress`].
#[derive(Debug)]
pub(crate) struct ProgressTracker {
    start_time: Instant,
    files_scanned: u64,
    dirs_scanned: u64,
    bytes_scanned: u64,
    errors_count: u64,
    current_path: PathBuf,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            files_scanned: 0,
            dirs_scanned: 0,
            bytes_scanned: 0,
            errors_count: 0,
            current_path: PathBuf::new(),
        }
    }

    pub fn record_file(&mut self, size: u64) {
        self.files_scanned += 1;
        self.bytes_scanned += size;
    }

    pub fn record_dir(&mut self) {
        self.dirs_scanned += 1;
    }

    pub fn set_errors(&mut self, count: usize) {
        self.errors_count = count as u64;
    }

    pub fn set_current_path(&mut self, path: PathBuf) {
        self.current_path = path;
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn snapshot(&self) -> ScanProgress {
        ScanProgress {
            files_scanned: self.files_scanned,
            dirs_scanned: self.dirs_scanned,
            bytes_scanned: self.bytes_scanned,
            current_path: self.current_path.clone(),
            errors_count: self.errors_count,
            elapsed: self.start_time.elapsed(),
        }
    }
}
