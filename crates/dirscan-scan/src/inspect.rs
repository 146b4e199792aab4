//! Per-entry inspection: file records, directory aggregates and listings.

use std::collections::HashSet;
use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use compact_str::CompactString;
use tracing::warn;

use dirscan_core::{
    DirectoryRecord, Entry, FileRecord, ScanConfig, ScanError, ScanWarning, Timestamps,
    WarningKind,
};

use crate::hasher::ContentHasher;

/// How a listed entry is treated by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One classified child from a directory listing.
#[derive(Debug, Clone)]
pub struct ListedEntry {
    /// Name as it appears in the parent directory.
    pub name: CompactString,
    /// Resolved absolute path (link target when a symlink was followed).
    pub path: PathBuf,
    /// Path under the parent directory, before link resolution.
    pub listed_path: PathBuf,
    /// Metadata of the resolved entry.
    pub metadata: Metadata,
    pub kind: EntryKind,
}

/// Immediate children of one directory, read in a single pass.
#[derive(Debug, Clone)]
pub struct DirListing {
    /// Resolved path of the listed directory.
    pub path: PathBuf,
    /// Supported children in enumeration order.
    pub entries: Vec<ListedEntry>,
}

impl DirListing {
    /// Regular file children.
    pub fn files(&self) -> impl Iterator<Item = &ListedEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::File)
    }

    /// Directory children.
    pub fn dirs(&self) -> impl Iterator<Item = &ListedEntry> {
        self.entries.iter().filter(|e| e.kind == EntryKind::Directory)
    }

    /// Sum of the sizes of the immediate file children.
    pub fn total_file_size(&self) -> u64 {
        self.files().map(|e| e.metadata.len()).sum()
    }
}

/// Produces records for single entries without recursing.
#[derive(Debug, Clone)]
pub struct EntryInspector {
    hasher: ContentHasher,
    config: ScanConfig,
}

impl EntryInspector {
    /// Create an inspector with default settings.
    pub fn new() -> Self {
        Self::from_config(&ScanConfig::default())
    }

    /// Create an inspector matching a scan configuration.
    pub fn from_config(config: &ScanConfig) -> Self {
        Self {
            hasher: ContentHasher::with_chunk_size(config.chunk_size),
            config: config.clone(),
        }
    }

    /// Inspect a single path, producing a file or directory record.
    ///
    /// Directory records carry counts for their immediate children but no
    /// `children` map. Paths that are neither a regular file nor a directory
    /// are rejected.
    pub fn inspect(&self, path: &Path) -> Result<Entry, ScanError> {
        let link_meta = fs::symlink_metadata(path).map_err(|e| ScanError::io(path, e))?;
        if link_meta.file_type().is_symlink() && !self.config.follow_symlinks {
            return Err(ScanError::UnsupportedEntry {
                path: path.to_path_buf(),
                kind: "symbolic link",
            });
        }

        let resolved = path.canonicalize().map_err(|e| ScanError::io(path, e))?;
        let metadata = fs::metadata(&resolved).map_err(|e| ScanError::io(&resolved, e))?;
        let name = entry_name(path);

        let kind = if metadata.is_file() {
            EntryKind::File
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            return Err(ScanError::UnsupportedEntry {
                path: resolved,
                kind: describe_file_type(&metadata),
            });
        };

        let entry = ListedEntry {
            name,
            path: resolved,
            listed_path: path.to_path_buf(),
            metadata,
            kind,
        };

        // Problems are already logged; a standalone inspection has nowhere
        // else to report them.
        let mut warnings = Vec::new();
        match kind {
            EntryKind::File => Ok(Entry::File(self.file_record(&entry, &mut warnings))),
            EntryKind::Directory => {
                let listing = self
                    .list_dir(&entry.path, &mut warnings)
                    .map_err(|e| ScanError::io(&entry.path, e))?;
                Ok(Entry::Directory(self.directory_record(&entry, &listing)))
            }
        }
    }

    /// Build the record for a listed file, hashing its content.
    ///
    /// A read failure leaves `hash` empty and adds a warning; it never fails
    /// the record.
    pub fn file_record(&self, entry: &ListedEntry, warnings: &mut Vec<ScanWarning>) -> FileRecord {
        let hash = match self.hasher.hash_file(&entry.path) {
            Ok(hash) => Some(hash),
            Err(err) => {
                push_warning(warnings, ScanWarning::read_error(&entry.path, &err));
                None
            }
        };

        FileRecord {
            path: entry.path.clone(),
            name: entry.name.clone(),
            size: entry.metadata.len(),
            timestamps: timestamps(&entry.metadata),
            hash,
        }
    }

    /// Build the aggregate record for a listed directory from its listing.
    pub fn directory_record(&self, entry: &ListedEntry, listing: &DirListing) -> DirectoryRecord {
        DirectoryRecord {
            path: entry.path.clone(),
            name: entry.name.clone(),
            total_size: listing.total_file_size(),
            file_count: listing.files().count() as u64,
            subdir_count: listing.dirs().count() as u64,
            timestamps: timestamps(&entry.metadata),
            children: None,
        }
    }

    /// List the immediate children of `dir` once, classifying each.
    ///
    /// Fails only when the directory itself cannot be opened. Children that
    /// cannot be classified, or are neither files nor directories, are left
    /// out with a warning. So is any child whose UTF-8 name matches an
    /// earlier sibling's; names in a listing are unique.
    pub fn list_dir(&self, dir: &Path, warnings: &mut Vec<ScanWarning>) -> io::Result<DirListing> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for dir_entry in fs::read_dir(dir)? {
            let dir_entry = match dir_entry {
                Ok(e) => e,
                Err(err) => {
                    push_warning(warnings, ScanWarning::metadata_error(dir, &err));
                    continue;
                }
            };

            let name = CompactString::new(dir_entry.file_name().to_string_lossy());
            if self.config.should_skip_hidden(&name) {
                continue;
            }

            let Some(entry) = self.classify(dir_entry.path(), name, warnings) else {
                continue;
            };
            if !seen.insert(entry.name.clone()) {
                push_warning(
                    warnings,
                    ScanWarning::name_collision(&entry.listed_path, &entry.name),
                );
                continue;
            }
            entries.push(entry);
        }

        Ok(DirListing {
            path: dir.to_path_buf(),
            entries,
        })
    }

    fn classify(
        &self,
        listed_path: PathBuf,
        name: CompactString,
        warnings: &mut Vec<ScanWarning>,
    ) -> Option<ListedEntry> {
        let link_meta = match fs::symlink_metadata(&listed_path) {
            Ok(m) => m,
            Err(err) => {
                push_warning(warnings, ScanWarning::metadata_error(&listed_path, &err));
                return None;
            }
        };

        let (path, metadata) = if link_meta.file_type().is_symlink() {
            if !self.config.follow_symlinks {
                push_warning(
                    warnings,
                    ScanWarning::skipped(&listed_path, WarningKind::Symlink, "symbolic link"),
                );
                return None;
            }
            match fs::canonicalize(&listed_path).and_then(|p| fs::metadata(&p).map(|m| (p, m))) {
                Ok(resolved) => resolved,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    let target = fs::read_link(&listed_path)
                        .map(|p| p.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    push_warning(warnings, ScanWarning::broken_symlink(&listed_path, &target));
                    return None;
                }
                Err(err) => {
                    push_warning(warnings, ScanWarning::metadata_error(&listed_path, &err));
                    return None;
                }
            }
        } else {
            (listed_path.clone(), link_meta)
        };

        let kind = if metadata.is_file() {
            EntryKind::File
        } else if metadata.is_dir() {
            EntryKind::Directory
        } else {
            push_warning(
                warnings,
                ScanWarning::skipped(
                    &listed_path,
                    WarningKind::Unsupported,
                    describe_file_type(&metadata),
                ),
            );
            return None;
        };

        Some(ListedEntry {
            name,
            path,
            listed_path,
            metadata,
            kind,
        })
    }
}

impl Default for EntryInspector {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a warning and keep it for the scan result.
pub(crate) fn push_warning(warnings: &mut Vec<ScanWarning>, warning: ScanWarning) {
    warn!(path = %warning.path.display(), kind = ?warning.kind, "{}", warning.message);
    warnings.push(warning);
}

fn entry_name(path: &Path) -> CompactString {
    path.file_name()
        .map(|n| CompactString::new(n.to_string_lossy()))
        .unwrap_or_else(|| CompactString::new(path.to_string_lossy()))
}

fn timestamps(metadata: &Metadata) -> Timestamps {
    let modified = metadata.modified().unwrap_or(UNIX_EPOCH);
    let created = metadata
        .created()
        .ok()
        .or_else(|| change_time(metadata))
        .unwrap_or(modified);
    Timestamps::new(created, modified)
}

/// Inode change time, used where the platform has no birth time.
#[cfg(unix)]
fn change_time(metadata: &Metadata) -> Option<SystemTime> {
    use std::os::unix::fs::MetadataExt;
    use std::time::Duration;

    let secs = u64::try_from(metadata.ctime()).ok()?;
    let nanos = u32::try_from(metadata.ctime_nsec()).unwrap_or(0);
    Some(UNIX_EPOCH + Duration::new(secs, nanos))
}

#[cfg(not(unix))]
fn change_time(_metadata: &Metadata) -> Option<SystemTime> {
    None
}

#[cfg(unix)]
fn describe_file_type(metadata: &Metadata) -> &'static str {
    use std::os::unix::fs::FileTypeExt;

    let ft = metadata.file_type();
    if ft.is_socket() {
        "socket"
    } else if ft.is_fifo() {
        "FIFO"
    } else if ft.is_block_device() {
        "block device"
    } else if ft.is_char_device() {
        "character device"
    } else if ft.is_symlink() {
        "symbolic link"
    } else {
        "special file"
    }
}

#[cfg(not(unix))]
fn describe_file_type(metadata: &Metadata) -> &'static str {
    if metadata.file_type().is_symlink() {
        "symbolic link"
    } else {
        "special file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_dir_with_mixed_children() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::write(root.join("one.txt"), "12345").unwrap();
        fs::write(root.join("two.txt"), "123").unwrap();
        fs::create_dir(root.join("nested")).unwrap();
        fs::write(root.join("nested/big.bin"), vec![0u8; 4096]).unwrap();
        fs::create_dir(root.join("empty")).unwrap();

        temp
    }

    #[test]
    fn test_inspect_file() {
        let temp = create_dir_with_mixed_children();
        let entry = EntryInspector::new()
            .inspect(&temp.path().join("one.txt"))
            .unwrap();

        let file = entry.as_file().expect("file record");
        assert_eq!(file.name.as_str(), "one.txt");
        assert_eq!(file.size, 5);
        assert!(file.path.is_absolute());
        assert_eq!(
            file.hash.map(|h| h.to_hex()),
            Some(blake3::hash(b"12345").to_hex().to_string())
        );
    }

    #[test]
    fn test_inspect_directory_counts_immediate_children_only() {
        let temp = create_dir_with_mixed_children();
        let entry = EntryInspector::new().inspect(temp.path()).unwrap();

        let dir = entry.as_dir().expect("directory record");
        assert_eq!(dir.file_count, 2);
        assert_eq!(dir.subdir_count, 2);
        // nested/big.bin is not folded in
        assert_eq!(dir.total_size, 8);
        assert!(dir.children.is_none());
    }

    #[test]
    fn test_list_dir_skips_hidden_when_configured() {
        let temp = create_dir_with_mixed_children();
        fs::write(temp.path().join(".hidden"), "x").unwrap();

        let mut config = ScanConfig::new(temp.path());
        let mut warnings = Vec::new();

        let listing = EntryInspector::from_config(&config)
            .list_dir(temp.path(), &mut warnings)
            .unwrap();
        assert_eq!(listing.files().count(), 3);

        config.include_hidden = false;
        let listing = EntryInspector::from_config(&config)
            .list_dir(temp.path(), &mut warnings)
            .unwrap();
        assert_eq!(listing.files().count(), 2);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_inspect_missing_path() {
        let temp = TempDir::new().unwrap();
        let err = EntryInspector::new()
            .inspect(&temp.path().join("missing"))
            .unwrap_err();
        assert!(matches!(err, ScanError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_inspect_rejects_unfollowed_symlink() {
        let temp = create_dir_with_mixed_children();
        let link = temp.path().join("link.txt");
        std::os::unix::fs::symlink(temp.path().join("one.txt"), &link).unwrap();

        let err = EntryInspector::new().inspect(&link).unwrap_err();
        assert!(matches!(
            err,
            ScanError::UnsupportedEntry {
                kind: "symbolic link",
                ..
            }
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_inspect_rejects_socket() {
        let temp = TempDir::new().unwrap();
        let socket = temp.path().join("sock");
        let _listener = std::os::unix::net::UnixListener::bind(&socket).unwrap();

        let err = EntryInspector::new().inspect(&socket).unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedEntry { kind: "socket", .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_list_dir_drops_colliding_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"a\xff")), "12").unwrap();
        fs::write(temp.path().join(OsStr::from_bytes(b"a\xfe")), "345").unwrap();

        let mut warnings = Vec::new();
        let listing = EntryInspector::new()
            .list_dir(temp.path(), &mut warnings)
            .unwrap();

        assert_eq!(listing.entries.len(), 1);
        assert_eq!(listing.entries[0].name.as_str(), "a\u{FFFD}");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::NameCollision);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_dir_warns_on_socket() {
        let temp = create_dir_with_mixed_children();
        let _listener = std::os::unix::net::UnixListener::bind(temp.path().join("sock")).unwrap();

        let mut warnings = Vec::new();
        let listing = EntryInspector::new()
            .list_dir(temp.path(), &mut warnings)
            .unwrap();

        assert!(!listing.entries.iter().any(|e| e.name.as_str() == "sock"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind, WarningKind::Unsupported);
    }
}
