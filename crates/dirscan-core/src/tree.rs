//! Scan tree container and statistics.

use std::path::PathBuf;
use std::time::Duration;

use compact_str::CompactString;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::node::{DirectoryRecord, Entry, FileRecord};

/// Mapping from entry name to its record, for one directory level.
///
/// Keys keep the order the filesystem listed them in. That order carries
/// no meaning and callers must not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanTree {
    entries: IndexMap<CompactString, Entry>,
}

impl ScanTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry under its own name, returning any entry it replaced.
    pub fn insert(&mut self, entry: impl Into<Entry>) -> Option<Entry> {
        let entry = entry.into();
        self.entries.insert(CompactString::new(entry.name()), entry)
    }

    /// Look up an entry by name.
    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.get(name)
    }

    /// Check if an entry with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries at this level.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this level has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, entry)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// File records at this level.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> {
        self.entries.values().filter_map(Entry::as_file)
    }

    /// Directory records at this level.
    pub fn directories(&self) -> impl Iterator<Item = &DirectoryRecord> {
        self.entries.values().filter_map(Entry::as_dir)
    }

    /// Count of file records in this tree and every nested `children` map.
    pub fn total_files(&self) -> u64 {
        self.entries
            .values()
            .map(|entry| match entry {
                Entry::File(_) => 1,
                Entry::Directory(d) => d.children.as_ref().map_or(0, ScanTree::total_files),
            })
            .sum()
    }
}

impl<'a> IntoIterator for &'a ScanTree {
    type Item = (&'a CompactString, &'a Entry);
    type IntoIter = indexmap::map::Iter<'a, CompactString, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<Entry> for ScanTree {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        let mut tree = ScanTree::new();
        for entry in iter {
            tree.insert(entry);
        }
        tree
    }
}

/// Summary statistics for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of file records emitted.
    pub total_files: u64,
    /// Number of directory records emitted.
    pub total_dirs: u64,
    /// Sum of the sizes of all emitted files.
    pub total_size: u64,
    /// Files whose content was hashed.
    pub hashed_files: u64,
    /// Files recorded with a null hash.
    pub unhashed_files: u64,
    /// Deepest level that produced a record (root children are level 1).
    pub max_depth: u32,
}

impl ScanStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update stats with a file record found at `depth`.
    pub fn record_file(&mut self, record: &FileRecord, depth: u32) {
        self.total_files += 1;
        self.total_size += record.size;
        if record.is_hashed() {
            self.hashed_files += 1;
        } else {
            self.unhashed_files += 1;
        }
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a directory found at `depth`.
    pub fn record_dir(&mut self, depth: u32) {
        self.total_dirs += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Complete outcome of one scan.
#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Entries under the root; this is what gets serialized.
    pub tree: ScanTree,

    /// Resolved root path that was scanned.
    pub root_path: PathBuf,

    /// Depth budget the scan started with.
    pub depth: u32,

    /// Summary statistics.
    pub stats: ScanStats,

    /// Duration of the scan.
    pub scan_duration: Duration,

    /// Non-fatal problems encountered during the scan.
    pub warnings: Vec<ScanWarning>,
}

impl ScanResult {
    /// Check if there were any warnings during scanning.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
