//! Export error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing scan output.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Destination file could not be created.
    #[error("Cannot create {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing the output failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tree could not be rendered as JSON.
    #[error("Failed to serialize scan tree: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Temporary file could not be moved onto the destination.
    #[error("Failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    /// Destination path involved, if the error has one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::Create { path, .. } | Self::Write { path, .. } | Self::Persist { path, .. } => {
                Some(path)
            }
            Self::Serialize(_) => None,
        }
    }
}
