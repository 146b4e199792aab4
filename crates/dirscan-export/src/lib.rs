//! JSON output for dirscan.
//!
//! Renders a [`ScanTree`] as UTF-8 JSON indented with four spaces, leaving
//! non-ASCII text unescaped, and writes it to a destination file.
//!
//! ```rust,no_run
//! use dirscan_core::ScanTree;
//! use dirscan_export::{JsonExporter, WriteMode};
//!
//! let tree = ScanTree::new();
//! JsonExporter::new()
//!     .with_mode(WriteMode::Atomic)
//!     .write(&tree, "scan.json")
//!     .unwrap();
//! ```

mod error;
mod writer;

pub use error::ExportError;
pub use writer::{INDENT, JsonExporter, WriteMode, to_json_string, write_json};

// Re-export core types
pub use dirscan_core::ScanTree;
