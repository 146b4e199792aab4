//! Streaming BLAKE3 content hashing.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use dirscan_core::{ContentHash, DEFAULT_CHUNK_SIZE};

/// Hashes file content in fixed-size chunks so memory use stays flat
/// regardless of file size.
#[derive(Debug, Clone)]
pub struct ContentHasher {
    chunk_size: usize,
}

impl ContentHasher {
    /// Create a hasher with the default chunk size.
    pub fn new() -> Self {
        Self::with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Create a hasher reading `chunk_size` bytes at a time.
    ///
    /// A zero chunk size is bumped to one byte.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Bytes read per chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Hash the full content of the file at `path`.
    ///
    /// The file is opened, streamed to the end and closed before returning.
    pub fn hash_file(&self, path: &Path) -> io::Result<ContentHash> {
        let file = File::open(path)?;
        self.hash_reader(file)
    }

    /// Hash everything `reader` yields until EOF.
    pub fn hash_reader<R: Read>(&self, mut reader: R) -> io::Result<ContentHash> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];

        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(ContentHash::new(*hasher.finalize().as_bytes()))
    }
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}
