//! Directory scanning engine for dirscan.
//!
//! Walks a directory tree depth-first up to a depth budget, recording
//! per-file metadata with a BLAKE3 content hash and per-directory
//! aggregates for the immediate children.
//!
//! # Overview
//!
//! - [`ContentHasher`] streams file content through BLAKE3 in fixed chunks
//! - [`EntryInspector`] turns a single path into a file or directory record
//! - [`TreeScanner`] recurses, attaching `children` while depth allows
//!
//! Unreadable files are still recorded, with a null hash; entries that
//! cannot be classified are skipped. Both produce a [`ScanWarning`].
//!
//! # Example
//!
//! ```rust,no_run
//! use dirscan_scan::{ScanConfig, TreeScanner};
//!
//! let config = ScanConfig::new("/path/to/scan").with_depth(2);
//! let result = TreeScanner::new().scan(&config).unwrap();
//!
//! println!("Files: {}", result.stats.total_files);
//! println!("Warnings: {}", result.warnings.len());
//! ```
//!
//! # Progress Monitoring
//!
//! ```rust,no_run
//! use dirscan_scan::{ScanConfig, TreeScanner};
//!
//! let scanner = TreeScanner::new();
//! let mut progress_rx = scanner.subscribe();
//!
//! std::thread::spawn(move || {
//!     while let Ok(progress) = progress_rx.blocking_recv() {
//!         eprintln!("Scanned {} files", progress.files_scanned);
//!     }
//! });
//!
//! scanner.scan(&ScanConfig::new(".")).unwrap();
//! ```

mod ancestors;
mod hasher;
mod inspect;
mod progress;
mod scanner;

pub use ancestors::AncestorSet;
pub use hasher::ContentHasher;
pub use inspect::{DirListing, EntryInspector, EntryKind, ListedEntry};
pub use progress::ScanProgress;
pub use scanner::TreeScanner;

// Re-export core types for convenience
pub use dirscan_core::{
    ContentHash, DirectoryRecord, Entry, FileRecord, ScanConfig, ScanError, ScanResult,
    ScanStats, ScanTree, ScanWarning, Timestamps, WarningKind,
};
