//! Error types for scanning operations.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during scanning.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Scan target is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Entry is neither a regular file nor a directory.
    #[error("Unsupported entry ({kind}): {path}")]
    UnsupportedEntry { path: PathBuf, kind: &'static str },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl ScanError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

/// Kind of scan warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarningKind {
    /// Permission was denied.
    PermissionDenied,
    /// File content could not be read for hashing.
    ReadError,
    /// Error reading metadata or listing a directory.
    MetadataError,
    /// Symbolic link skipped because links are not followed.
    Symlink,
    /// Symbolic link target does not exist.
    BrokenSymlink,
    /// Followed link leads back into a directory already being scanned.
    SymlinkCycle,
    /// Socket, device, FIFO or other non-regular entry.
    Unsupported,
    /// Name maps to the same key as an earlier sibling once made UTF-8.
    NameCollision,
}

/// Non-fatal warning encountered during scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanWarning {
    /// Path where the warning occurred.
    pub path: PathBuf,
    /// Human-readable message.
    pub message: String,
    /// Kind of warning.
    pub kind: WarningKind,
}

impl ScanWarning {
    /// Create a new scan warning.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            kind,
        }
    }

    /// Create a warning for a file whose content could not be hashed.
    ///
    /// The record is still emitted, so the cause only shows in the message.
    pub fn read_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        Self {
            message: format!("Failed to read file: {error}"),
            path: path.into(),
            kind: WarningKind::ReadError,
        }
    }

    /// Create a metadata / listing error warning.
    pub fn metadata_error(path: impl Into<PathBuf>, error: &std::io::Error) -> Self {
        let kind = match error.kind() {
            std::io::ErrorKind::PermissionDenied => WarningKind::PermissionDenied,
            _ => WarningKind::MetadataError,
        };
        Self {
            message: format!("Failed to read metadata: {error}"),
            path: path.into(),
            kind,
        }
    }

    /// Create a broken symlink warning.
    pub fn broken_symlink(path: impl Into<PathBuf>, target: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Broken symlink: {} -> {target}", path.display()),
            path,
            kind: WarningKind::BrokenSymlink,
        }
    }

    /// Create a symlink cycle warning.
    pub fn symlink_cycle(path: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let target = target.into();
        Self {
            message: format!(
                "Symlink cycle: {} -> {} is already being scanned",
                path.display(),
                target.display()
            ),
            path,
            kind: WarningKind::SymlinkCycle,
        }
    }

    /// Create a warning for an entry dropped because an earlier sibling
    /// already claimed its (lossily converted) name.
    pub fn name_collision(path: impl Into<PathBuf>, name: &str) -> Self {
        let path = path.into();
        Self {
            message: format!(
                "Skipped {}: name collides with an earlier entry as \"{name}\"",
                path.display()
            ),
            path,
            kind: WarningKind::NameCollision,
        }
    }

    /// Create a warning for an entry that was skipped because of its kind.
    pub fn skipped(path: impl Into<PathBuf>, kind: WarningKind, what: &str) -> Self {
        let path = path.into();
        Self {
            message: format!("Skipped {what}: {}", path.display()),
            path,
            kind,
        }
    }
}
