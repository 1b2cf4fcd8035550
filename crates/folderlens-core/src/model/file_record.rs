/// Per-file metadata produced by the walker.
use crate::analysis::category::{categorize, Category};
use compact_str::CompactString;
use serde::Serialize;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One regular file seen during a scan. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Absolute path of the file.
    pub path: PathBuf,
    /// Logical size in bytes.
    pub size: u64,
    /// Last-modified timestamp, when the platform reports one.
    pub modified: Option<SystemTime>,
    /// Lowercase extension without the leading dot; empty when there is none.
    pub extension: CompactString,
}

impl FileRecord {
    pub fn new(path: PathBuf, size: u64, modified: Option<SystemTime>) -> Self {
        let extension = extension_of(&path);
        Self {
            path,
            size,
            modified,
            extension,
        }
    }

    pub fn from_metadata(path: PathBuf, meta: &Metadata) -> Self {
        Self::new(path, meta.len(), meta.modified().ok())
    }

    /// File name component, lossily converted for display and matching.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn category(&self) -> Category {
        categorize(&self.extension)
    }
}

/// Lowercase extension of `path`, or an empty string.
///
/// Dot-files such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> CompactString {
    path.extension()
        .map(|ext| CompactString::new(ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}
