/// A single directory in the arena-allocated directory tree.
///
/// Nodes are stored in a flat `Vec<DirectoryNode>`. Parent-child links are
/// indices rather than pointers, which keeps the tree trivially cloneable
/// and serialisable.
use super::file_record::FileRecord;
use compact_str::CompactString;
use serde::Serialize;
use std::path::PathBuf;

/// Lightweight index into the arena `Vec<DirectoryNode>`.
///
/// `u32` keeps indices small; four billion directories is far beyond any
/// folder this tool is pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A directory and the aggregate of everything beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryNode {
    pub path: PathBuf,

    /// Directory name only; for the scan root, the root's display name.
    pub name: CompactString,

    /// Sum of all descendant file sizes (own files plus every subdirectory).
    pub total_size: u64,

    /// Number of descendant files.
    pub file_count: u64,

    /// Number of descendant directories, not counting this one.
    pub dir_count: u64,

    /// `None` only for the scan root.
    pub parent: Option<NodeIndex>,

    /// Subdirectories in walk order (lexicographic by name).
    pub children: Vec<NodeIndex>,

    /// Files directly inside this directory, in walk order.
    pub files: Vec<FileRecord>,
}

impl DirectoryNode {
    pub fn new(path: PathBuf, name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            path,
            name,
            total_size: 0,
            file_count: 0,
            dir_count: 0,
            parent,
            children: Vec::new(),
            files: Vec::new(),
        }
    }

    /// Bytes held directly by this directory's own files.
    pub fn own_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}
