//! File and directory record types.

use std::fmt;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use compact_str::CompactString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::tree::ScanTree;

/// BLAKE3 content digest of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash(pub [u8; 32]);

impl ContentHash {
    /// Create a new ContentHash from raw bytes.
    pub fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the hash as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Parse a 64-character hex digest.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(hex, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid content hash: {hex}")))
    }
}

/// A point in time, serialized as fractional seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub SystemTime);

impl Timestamp {
    /// Seconds since the Unix epoch; negative for earlier times.
    pub fn as_secs_f64(&self) -> f64 {
        match self.0.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs_f64(),
            Err(e) => -e.duration().as_secs_f64(),
        }
    }

    /// Build a timestamp from fractional seconds since the Unix epoch.
    ///
    /// Returns `None` for non-finite values and for times the platform
    /// cannot represent.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        let offset = Duration::try_from_secs_f64(secs.abs()).ok()?;
        let time = if secs >= 0.0 {
            UNIX_EPOCH.checked_add(offset)
        } else {
            UNIX_EPOCH.checked_sub(offset)
        };
        time.map(Self)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(time)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Self::from_secs_f64(secs)
            .ok_or_else(|| serde::de::Error::custom(format!("timestamp out of range: {secs}")))
    }
}

/// Creation and modification times of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    /// Birth time, or the closest thing the platform offers.
    #[serde(rename = "creation_time")]
    pub created: Timestamp,
    /// Last modification time.
    #[serde(rename = "last_modified_time")]
    pub modified: Timestamp,
}

impl Timestamps {
    /// Create timestamps from raw system times.
    pub fn new(created: SystemTime, modified: SystemTime) -> Self {
        Self {
            created: Timestamp(created),
            modified: Timestamp(modified),
        }
    }
}

/// Metadata for a single regular file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Absolute, resolved path.
    #[serde(with = "lossy_path")]
    pub path: PathBuf,

    /// File name (last path component).
    pub name: CompactString,

    /// Size in bytes.
    pub size: u64,

    #[serde(flatten)]
    pub timestamps: Timestamps,

    /// Content digest, `None` when the file could not be read.
    pub hash: Option<ContentHash>,
}

impl FileRecord {
    /// Whether the content was hashed successfully.
    pub fn is_hashed(&self) -> bool {
        self.hash.is_some()
    }
}

/// Aggregate metadata for a directory.
///
/// Counts and `total_size` cover immediate children only; nested
/// subdirectory contents are never folded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryRecord {
    /// Absolute, resolved path.
    #[serde(with = "lossy_path")]
    pub path: PathBuf,

    /// Directory name (last path component).
    pub name: CompactString,

    /// Sum of the sizes of the immediate file children.
    pub total_size: u64,

    /// Number of immediate file children.
    pub file_count: u64,

    /// Number of immediate subdirectories.
    pub subdir_count: u64,

    #[serde(flatten)]
    pub timestamps: Timestamps,

    /// Scanned contents, present only when the depth budget allowed descent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ScanTree>,
}

/// A scanned filesystem entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entry {
    /// Regular file.
    File(FileRecord),
    /// Directory.
    Directory(DirectoryRecord),
}

impl Entry {
    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, Entry::Directory(_))
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, Entry::File(_))
    }

    /// Entry name.
    pub fn name(&self) -> &str {
        match self {
            Entry::File(f) => &f.name,
            Entry::Directory(d) => &d.name,
        }
    }

    /// File record, if this is a file.
    pub fn as_file(&self) -> Option<&FileRecord> {
        match self {
            Entry::File(f) => Some(f),
            Entry::Directory(_) => None,
        }
    }

    /// Directory record, if this is a directory.
    pub fn as_dir(&self) -> Option<&DirectoryRecord> {
        match self {
            Entry::Directory(d) => Some(d),
            Entry::File(_) => None,
        }
    }
}

impl From<FileRecord> for Entry {
    fn from(record: FileRecord) -> Self {
        Entry::File(record)
    }
}

impl From<DirectoryRecord> for Entry {
    fn from(record: DirectoryRecord) -> Self {
        Entry::Directory(record)
    }
}

/// Paths are written as strings; non UTF-8 components are replaced.
mod lossy_path {
    use std::path::{Path, PathBuf};

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&path.to_string_lossy())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathBuf, D::Error> {
        String::deserialize(deserializer).map(PathBuf::from)
    }
}
