//! Core types for dirscan.
//!
//! This crate provides the data structures shared by the scanner and the
//! exporter: file and directory records, the scan tree, configuration and
//! error types.

mod config;
mod error;
mod node;
mod tree;

pub use config::{DEFAULT_CHUNK_SIZE, DEFAULT_DEPTH, ScanConfig, ScanConfigBuilder};
pub use error::{ScanError, ScanWarning, WarningKind};
pub use node::{ContentHash, DirectoryRecord, Entry, FileRecord, Timestamp, Timestamps};
pub use tree::{ScanResult, ScanStats, ScanTree};
