//! Indented JSON writer.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use tempfile::NamedTempFile;
use tracing::debug;

use dirscan_core::ScanTree;

use crate::error::ExportError;

/// Indentation unit of the output.
pub const INDENT: &[u8] = b"    ";

/// How the destination file is replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate and write the destination in place.
    #[default]
    Direct,
    /// Write a temporary file next to the destination, then rename it over.
    Atomic,
}

/// Writes scan trees to disk as JSON.
#[derive(Debug, Clone, Default)]
pub struct JsonExporter {
    mode: WriteMode,
}

impl JsonExporter {
    /// Create an exporter that writes in place.
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose how the destination is replaced.
    pub fn with_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Write `tree` to `dest`, replacing any existing file.
    pub fn write(&self, tree: &ScanTree, dest: impl AsRef<Path>) -> Result<(), ExportError> {
        let dest = dest.as_ref();
        debug!(path = %dest.display(), mode = ?self.mode, entries = tree.len(), "Writing scan tree");

        match self.mode {
            WriteMode::Direct => write_direct(tree, dest),
            WriteMode::Atomic => write_atomic(tree, dest),
        }
    }
}

/// Serialize `value` to `writer` with four-space indentation.
pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<(), serde_json::Error> {
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut serializer = Serializer::with_formatter(writer, formatter);
    value.serialize(&mut serializer)
}

/// Render `value` as an indented JSON string.
pub fn to_json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    write_json(&mut buf, value)?;
    // serde_json only emits valid UTF-8.
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

fn write_direct(tree: &ScanTree, dest: &Path) -> Result<(), ExportError> {
    let file = File::create(dest).map_err(|source| ExportError::Create {
        path: dest.to_path_buf(),
        source,
    })?;

    let mut writer = BufWriter::new(file);
    serialize_into(&mut writer, tree, dest)?;
    writer.flush().map_err(|source| ExportError::Write {
        path: dest.to_path_buf(),
        source,
    })
}

fn write_atomic(tree: &ScanTree, dest: &Path) -> Result<(), ExportError> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| ExportError::Create {
        path: dest.to_path_buf(),
        source,
    })?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        serialize_into(&mut writer, tree, dest)?;
        writer.flush().map_err(|source| ExportError::Write {
            path: dest.to_path_buf(),
            source,
        })?;
    }

    tmp.persist(dest).map_err(|err| ExportError::Persist {
        path: dest.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}

fn serialize_into<W: Write>(writer: W, tree: &ScanTree, dest: &Path) -> Result<(), ExportError> {
    write_json(writer, tree).map_err(|err| {
        if err.is_io() {
            ExportError::Write {
                path: dest.to_path_buf(),
                source: io::Error::from(err),
            }
        } else {
            ExportError::Serialize(err)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::UNIX_EPOCH;

    use dirscan_core::{FileRecord, Timestamps};
    use tempfile::TempDir;

    fn sample_tree(name: &str) -> ScanTree {
        let mut tree = ScanTree::new();
        tree.insert(FileRecord {
            path: PathBuf::from("/data").join(name),
            name: name.into(),
            size: 1,
            timestamps: Timestamps::new(UNIX_EPOCH, UNIX_EPOCH),
            hash: None,
        });
        tree
    }

    #[test]
    fn test_four_space_indent() {
        let text = to_json_string(&sample_tree("a.txt")).unwrap();
        let mut lines = text.lines();

        assert_eq!(lines.next(), Some("{"));
        assert_eq!(lines.next(), Some(r#"    "a.txt": {"#));
        assert_eq!(lines.next(), Some(r#"        "type": "file","#));
    }

    #[test]
    fn test_non_ascii_is_not_escaped() {
        let text = to_json_string(&sample_tree("café ☕.txt")).unwrap();
        assert!(text.contains("café ☕.txt"));
        assert!(!text.contains("\\u"));
    }

    #[test]
    fn test_empty_tree() {
        assert_eq!(to_json_string(&ScanTree::new()).unwrap(), "{}");
    }

    #[test]
    fn test_direct_write_overwrites() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.json");
        fs::write(&dest, "stale content that is longer than the new output ".repeat(20)).unwrap();

        JsonExporter::new().write(&ScanTree::new(), &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("out.json");

        JsonExporter::new()
            .with_mode(WriteMode::Atomic)
            .write(&sample_tree("a.txt"), &dest)
            .unwrap();

        let names: Vec<_> = fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.json")]);

        let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
        assert_eq!(parsed["a.txt"]["type"], "file");
    }

    #[test]
    fn test_missing_parent_directory_fails() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("no/such/dir/out.json");

        for mode in [WriteMode::Direct, WriteMode::Atomic] {
            let err = JsonExporter::new()
                .with_mode(mode)
                .write(&ScanTree::new(), &dest)
                .unwrap_err();
            assert!(matches!(err, ExportError::Create { .. }), "{mode:?}");
            assert_eq!(err.path(), Some(dest.as_path()));
        }
        assert!(!dest.exists());
    }
}
