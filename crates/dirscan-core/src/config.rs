//! Scan configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Default recursion budget.
pub const DEFAULT_DEPTH: u32 = 3;

/// Default read size when streaming file content into the hasher.
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Configuration for scanning operations.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Root directory to scan.
    pub root: PathBuf,

    /// Remaining directory levels to descend into. A value of 1 records
    /// only the root's files; each extra level admits one more layer of
    /// subdirectories.
    #[builder(default = "DEFAULT_DEPTH")]
    #[serde(default = "default_depth")]
    pub max_depth: u32,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Include hidden entries (starting with .).
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub include_hidden: bool,

    /// Bytes read per chunk while hashing.
    #[builder(default = "DEFAULT_CHUNK_SIZE")]
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_depth() -> u32 {
    DEFAULT_DEPTH
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.root {
            if root.as_os_str().is_empty() {
                return Err("Root path cannot be empty".to_string());
            }
        } else {
            return Err("Root path is required".to_string());
        }
        if self.max_depth == Some(0) {
            return Err("Depth must be at least 1".to_string());
        }
        if self.chunk_size == Some(0) {
            return Err("Chunk size must be greater than zero".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a simple config for scanning a path with default settings.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_depth: DEFAULT_DEPTH,
            follow_symlinks: false,
            include_hidden: true,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Same config with a different depth budget.
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Check if hidden entries should be skipped.
    pub fn should_skip_hidden(&self, name: &str) -> bool {
        !self.include_hidden && name.starts_with('.')
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(".")
    }
}
