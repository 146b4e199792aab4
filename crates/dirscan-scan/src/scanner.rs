//! Depth-bounded recursive directory scanner.

use std::path::{Path, PathBuf};

use tokio::sync::broadcast;
use tracing::{debug, info};

use dirscan_core::{ScanConfig, ScanError, ScanResult, ScanStats, ScanTree, ScanWarning};

use crate::ancestors::AncestorSet;
use crate::inspect::{DirListing, EntryInspector, EntryKind, push_warning};
use crate::progress::{ProgressTracker, ScanProgress};

/// Sequential depth-first scanner.
///
/// Each directory is listed once, its files hashed one at a time, and its
/// subdirectories descended into while the depth budget allows.
pub struct TreeScanner {
    progress_tx: broadcast::Sender<ScanProgress>,
}

/// Mutable state threaded through one scan.
struct ScanContext {
    inspector: EntryInspector,
    stats: ScanStats,
    warnings: Vec<ScanWarning>,
    ancestors: AncestorSet,
    tracker: ProgressTracker,
}

impl TreeScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self { progress_tx }
    }

    /// Subscribe to scan progress updates.
    ///
    /// Slow receivers miss intermediate snapshots; the scan never waits.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Scan `path` with a depth budget and default settings, returning
    /// only the tree.
    pub fn scan_tree(&self, path: impl Into<PathBuf>, depth: u32) -> Result<ScanTree, ScanError> {
        let config = ScanConfig::new(path).with_depth(depth);
        self.scan(&config).map(|result| result.tree)
    }

    /// Perform a scan of the configured root.
    pub fn scan(&self, config: &ScanConfig) -> Result<ScanResult, ScanError> {
        if config.max_depth == 0 {
            return Err(ScanError::InvalidConfig {
                message: "depth must be at least 1".to_string(),
            });
        }

        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        info!(root = %root_path.display(), depth = config.max_depth, "Scanning directory");

        let mut ctx = ScanContext {
            inspector: EntryInspector::from_config(config),
            stats: ScanStats::new(),
            warnings: Vec::new(),
            ancestors: AncestorSet::new(),
            tracker: ProgressTracker::new(),
        };

        let listing = ctx
            .inspector
            .list_dir(&root_path, &mut ctx.warnings)
            .map_err(|e| ScanError::io(&root_path, e))?;

        ctx.ancestors.enter(&root_path);
        let tree = self.scan_listing(&mut ctx, listing, config.max_depth, 1);
        ctx.ancestors.leave(&root_path);

        self.publish(&mut ctx, &root_path);

        Ok(ScanResult {
            tree,
            root_path,
            depth: config.max_depth,
            stats: ctx.stats,
            scan_duration: ctx.tracker.elapsed(),
            warnings: ctx.warnings,
        })
    }

    /// Build the tree for one already-listed directory.
    ///
    /// `depth` is the remaining budget for this level; `level` is how far
    /// below the root this listing's entries sit.
    fn scan_listing(
        &self,
        ctx: &mut ScanContext,
        listing: DirListing,
        depth: u32,
        level: u32,
    ) -> ScanTree {
        debug!(path = %listing.path.display(), depth, "Listing directory");

        let mut tree = ScanTree::new();

        for entry in &listing.entries {
            match entry.kind {
                EntryKind::File => {
                    let record = ctx.inspector.file_record(entry, &mut ctx.warnings);
                    ctx.stats.record_file(&record, level);
                    ctx.tracker.record_file(record.size);
                    self.publish(ctx, &entry.path);
                    let replaced = tree.insert(record);
                    debug_assert!(replaced.is_none(), "listing names are unique");
                }
                EntryKind::Directory if depth > 1 => {
                    if !ctx.ancestors.enter(&entry.path) {
                        push_warning(
                            &mut ctx.warnings,
                            ScanWarning::symlink_cycle(&entry.listed_path, &entry.path),
                        );
                        continue;
                    }

                    let sub_listing = match ctx.inspector.list_dir(&entry.path, &mut ctx.warnings) {
                        Ok(listing) => listing,
                        Err(err) => {
                            push_warning(
                                &mut ctx.warnings,
                                ScanWarning::metadata_error(&entry.path, &err),
                            );
                            ctx.ancestors.leave(&entry.path);
                            continue;
                        }
                    };

                    let mut record = ctx.inspector.directory_record(entry, &sub_listing);
                    ctx.stats.record_dir(level);
                    ctx.tracker.record_dir();
                    self.publish(ctx, &entry.path);

                    record.children = Some(self.scan_listing(ctx, sub_listing, depth - 1, level + 1));
                    ctx.ancestors.leave(&entry.path);
                    let replaced = tree.insert(record);
                    debug_assert!(replaced.is_none(), "listing names are unique");
                }
                // Budget exhausted: the branch is dropped, not stubbed.
                EntryKind::Directory => {}
            }
        }

        tree
    }

    fn publish(&self, ctx: &mut ScanContext, path: &Path) {
        if self.progress_tx.receiver_count() == 0 {
            return;
        }
        ctx.tracker.set_errors(ctx.warnings.len());
        ctx.tracker.set_current_path(path.to_path_buf());
        let _ = self.progress_tx.send(ctx.tracker.snapshot());
    }
}

impl Default for TreeScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirscan_core::{Entry, WarningKind};
    use std::fs;
    use tempfile::TempDir;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.txt"), "another file here").unwrap();

        temp
    }

    fn dir<'a>(tree: &'a ScanTree, name: &str) -> &'a dirscan_core::DirectoryRecord {
        tree.get(name).and_then(Entry::as_dir).unwrap()
    }

    #[test]
    fn test_depth_one_keeps_only_root_files() {
        let temp = create_test_tree();
        let tree = TreeScanner::new().scan_tree(temp.path(), 1).unwrap();

        assert_eq!(tree.len(), 1);
        assert!(tree.get("file1.txt").is_some_and(Entry::is_file));
        assert!(!tree.contains("dir1"));
        assert!(!tree.contains("dir2"));
    }

    #[test]
    fn test_depth_two_expands_one_level() {
        let temp = create_test_tree();
        let tree = TreeScanner::new().scan_tree(temp.path(), 2).unwrap();

        let dir1 = dir(&tree, "dir1");
        let children = dir1.children.as_ref().unwrap();
        assert!(children.contains("file2.txt"));
        // subdir sits at the exhausted level
        assert!(!children.contains("subdir"));
        assert_eq!(dir1.subdir_count, 1);
        assert_eq!(dir1.file_count, 1);
    }

    #[test]
    fn test_default_depth_reaches_third_level() {
        let temp = create_test_tree();
        let result = TreeScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        let subdir = dir(dir(&result.tree, "dir1").children.as_ref().unwrap(), "subdir");
        assert!(subdir.children.as_ref().unwrap().contains("file3.txt"));
        assert_eq!(result.stats.total_files, 4);
        assert_eq!(result.stats.total_dirs, 3);
        assert_eq!(result.stats.max_depth, 3);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_not_a_directory() {
        let temp = create_test_tree();
        let err = TreeScanner::new()
            .scan_tree(temp.path().join("file1.txt"), 3)
            .unwrap_err();
        assert!(matches!(err, ScanError::NotADirectory { .. }));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let temp = create_test_tree();
        let err = TreeScanner::new().scan_tree(temp.path(), 0).unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig { .. }));
    }

    #[test]
    fn test_progress_is_published() {
        let temp = create_test_tree();
        let scanner = TreeScanner::new();
        let mut rx = scanner.subscribe();

        scanner.scan(&ScanConfig::new(temp.path())).unwrap();

        let mut last = None;
        while let Ok(progress) = rx.try_recv() {
            last = Some(progress);
        }
        let last = last.expect("at least one progress update");
        assert_eq!(last.files_scanned, 4);
        assert_eq!(last.dirs_scanned, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_skipped_by_default() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("dir1"), temp.path().join("link")).unwrap();

        let result = TreeScanner::new().scan(&ScanConfig::new(temp.path())).unwrap();

        assert!(!result.tree.contains("link"));
        assert!(result.warnings.iter().any(|w| w.kind == WarningKind::Symlink));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_is_cut() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path(), temp.path().join("dir1/back")).unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .max_depth(10u32)
            .follow_symlinks(true)
            .build()
            .unwrap();
        let result = TreeScanner::new().scan(&config).unwrap();

        let dir1 = dir(&result.tree, "dir1");
        assert!(!dir1.children.as_ref().unwrap().contains("back"));
        // Still counted by the parent's listing.
        assert_eq!(dir1.subdir_count, 2);
        assert!(result.warnings.iter().any(|w| w.kind == WarningKind::SymlinkCycle));
    }

    #[cfg(unix)]
    #[test]
    fn test_followed_file_link_records_target_path() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("file1.txt"), temp.path().join("alias")).unwrap();

        let config = ScanConfig::builder()
            .root(temp.path())
            .follow_symlinks(true)
            .build()
            .unwrap();
        let result = TreeScanner::new().scan(&config).unwrap();

        let alias = result.tree.get("alias").and_then(Entry::as_file).unwrap();
        assert_eq!(alias.name.as_str(), "alias");
        assert_eq!(alias.path, result.root_path.join("file1.txt"));
        assert_eq!(alias.size, 5);
    }
}
