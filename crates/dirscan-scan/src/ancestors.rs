//! Cycle guard for followed symbolic links.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Resolved paths of the directories on the current descent path.
///
/// A directory whose resolved path is already on the stack can only be
/// reached through a link pointing back up the tree; entering it again
/// would loop until the depth budget ran out.
#[derive(Debug, Default)]
pub struct AncestorSet {
    active: HashSet<PathBuf>,
}

impl AncestorSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a directory as entered. Returns `false` if it is already an
    /// ancestor of the current position.
    pub fn enter(&mut self, path: &Path) -> bool {
        self.active.insert(path.to_path_buf())
    }

    /// Mark a directory as finished.
    pub fn leave(&mut self, path: &Path) {
        self.active.remove(path);
    }
}
