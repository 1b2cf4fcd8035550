/// Arena-backed directory tree with an O(n) bottom-up re-derivation pass.
///
/// All directories live in a single `Vec<DirectoryNode>` in pre-order: a
/// directory is always appended before any of its descendants. Iterating the
/// arena in reverse therefore visits every child before its parent.
use super::dir_node::{DirectoryNode, NodeIndex};
use super::file_record::FileRecord;
use compact_str::CompactString;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// The complete directory tree produced by a scan.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryTree {
    /// Arena: every directory in a flat vector, pre-order.
    pub nodes: Vec<DirectoryNode>,
    pub root: NodeIndex,
}

impl DirectoryTree {
    /// Create a tree containing only the root directory.
    pub fn new(root_path: PathBuf) -> Self {
        let name = CompactString::new(root_display_name(&root_path));
        Self {
            nodes: vec![DirectoryNode::new(root_path, name, None)],
            root: NodeIndex(0),
        }
    }

    /// Append a subdirectory of `parent` and return its index.
    pub fn add_dir(&mut self, parent: NodeIndex, path: PathBuf) -> NodeIndex {
        let name = path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_default();
        let idx = NodeIndex::new(self.nodes.len());
        self.nodes.push(DirectoryNode::new(path, name, Some(parent)));
        self.nodes[parent.idx()].children.push(idx);
        idx
    }

    /// Attach a file to `dir`. Aggregates are not touched; see
    /// [`recompute_totals`](Self::recompute_totals).
    pub fn add_file(&mut self, dir: NodeIndex, record: FileRecord) {
        self.nodes[dir.idx()].files.push(record);
    }

    /// Re-derive sizes and counts for every directory in a single reverse pass.
    ///
    /// Safe to call repeatedly: aggregates are reset first.
    pub fn recompute_totals(&mut self) {
        for node in self.nodes.iter_mut() {
            node.total_size = 0;
            node.file_count = 0;
            node.dir_count = 0;
        }

        for i in (0..self.nodes.len()).rev() {
            let own_size = self.nodes[i].own_size();
            let own_files = self.nodes[i].files.len() as u64;
            let node = &mut self.nodes[i];
            node.total_size += own_size;
            node.file_count += own_files;

            let (size, files, dirs) = (node.total_size, node.file_count, node.dir_count);
            if let Some(parent) = node.parent {
                let parent = &mut self.nodes[parent.idx()];
                parent.total_size += size;
                parent.file_count += files;
                parent.dir_count += dirs + 1;
            }
        }
    }

    /// `true` when every stored aggregate matches a fresh re-derivation.
    pub fn is_consistent(&self) -> bool {
        let mut fresh = self.clone();
        fresh.recompute_totals();
        fresh.nodes.iter().zip(&self.nodes).all(|(a, b)| {
            a.total_size == b.total_size && a.file_count == b.file_count && a.dir_count == b.dir_count
        })
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &DirectoryNode {
        &self.nodes[index.idx()]
    }

    #[inline]
    pub fn node_mut(&mut self, index: NodeIndex) -> &mut DirectoryNode {
        &mut self.nodes[index.idx()]
    }

    #[inline]
    pub fn root_node(&self) -> &DirectoryNode {
        self.node(self.root)
    }

    /// Number of directories in the tree, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the root directory is present from construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every file in the tree.
    pub fn files(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.nodes.iter().flat_map(|n| n.files.iter())
    }

    /// Every file at or below `dir`.
    pub fn files_under(&self, dir: NodeIndex) -> Vec<&FileRecord> {
        let mut out = Vec::new();
        let mut stack = vec![dir];
        while let Some(idx) = stack.pop() {
            let node = self.node(idx);
            out.extend(node.files.iter());
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Direct subdirectories of `parent`, largest first, ties by name.
    pub fn children_sorted_by_size(&self, parent: NodeIndex) -> Vec<NodeIndex> {
        let mut children = self.node(parent).children.clone();
        children.sort_by(|&a, &b| {
            let (a, b) = (self.node(a), self.node(b));
            b.total_size.cmp(&a.total_size).then_with(|| a.name.cmp(&b.name))
        });
        children
    }

    /// Find the directory with exactly this path.
    pub fn find(&self, path: &Path) -> Option<NodeIndex> {
        self.nodes
            .iter()
            .position(|n| n.path == path)
            .map(NodeIndex::new)
    }
}

/// Display name for the scan root: the last path component, or the whole
/// path for roots such as `/` that have none.
pub fn root_display_name(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}
