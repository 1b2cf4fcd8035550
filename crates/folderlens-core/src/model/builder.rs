/// Streaming construction of a [`DirectoryTree`] from walker events.
///
/// Files are added to the directory currently open. When a directory is
/// exited its completed totals are folded into its parent, so aggregates are
/// built bottom-up as each subtree finishes and never need a second pass.
use super::dir_node::NodeIndex;
use super::dir_tree::DirectoryTree;
use crate::scanner::walker::WalkEvent;
use std::path::PathBuf;

pub struct TreeBuilder {
    tree: DirectoryTree,
    /// Directories entered but not yet exited, innermost last.
    open: Vec<NodeIndex>,
}

impl TreeBuilder {
    pub fn new(root: PathBuf) -> Self {
        Self {
            tree: DirectoryTree::new(root),
            open: Vec::new(),
        }
    }

    pub fn apply(&mut self, event: &WalkEvent) {
        match event {
            WalkEvent::EnterDir { path, .. } => {
                let idx = match self.open.last() {
                    Some(&parent) => self.tree.add_dir(parent, path.clone()),
                    None => self.tree.root,
                };
                self.open.push(idx);
            }
            WalkEvent::File(record) => {
                let Some(&dir) = self.open.last() else {
                    debug_assert!(false, "file event outside any directory");
                    return;
                };
                let node = self.tree.node_mut(dir);
                node.total_size += record.size;
                node.file_count += 1;
                node.files.push(record.clone());
            }
            WalkEvent::ExitDir { .. } => self.close_innermost(),
            WalkEvent::Skipped(_) => {}
        }
    }

    /// Number of directories currently open.
    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Close any directories still open and return the finished tree.
    pub fn finish(mut self) -> DirectoryTree {
        while !self.open.is_empty() {
            self.close_innermost();
        }
        debug_assert!(self.tree.is_consistent(), "streamed totals drifted");
        self.tree
    }

    fn close_innermost(&mut self) {
        let Some(done) = self.open.pop() else {
            return;
        };
        let Some(&parent) = self.open.last() else {
            return;
        };
        let child = self.tree.node(done);
        let (size, files, dirs) = (child.total_size, child.file_count, child.dir_count);
        let parent = self.tree.node_mut(parent);
        parent.total_size += size;
        parent.file_count += files;
        parent.dir_count += dirs + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FileRecord;

    fn enter(path: &str, depth: usize) -> WalkEvent {
        WalkEvent::EnterDir {
            path: PathBuf::from(path),
            depth,
        }
    }

    fn exit(path: &str) -> WalkEvent {
        WalkEvent::ExitDir {
            path: PathBuf::from(path),
        }
    }

    fn file(path: &str, size: u64) -> WalkEvent {
        WalkEvent::File(FileRecord::new(PathBuf::from(path), size, None))
    }

    #[test]
    fn folds_subtrees_into_parents() {
        let mut builder = TreeBuilder::new(PathBuf::from("/r"));
        for event in [
            enter("/r", 0),
            enter("/r/a", 1),
            file("/r/a/x.txt", 10),
            enter("/r/a/deep", 2),
            file("/r/a/deep/y.txt", 20),
            exit("/r/a/deep"),
            exit("/r/a"),
            file("/r/z.rs", 5),
            exit("/r"),
        ] {
            builder.apply(&event);
        }
        assert_eq!(builder.depth(), 0);

        let tree = builder.finish();
        let root = tree.root_node();
        assert_eq!(root.total_size, 35);
        assert_eq!(root.file_count, 3);
        assert_eq!(root.dir_count, 2);
        assert_eq!(tree.len(), 3);
        assert!(tree.is_consistent());
    }

    #[test]
    fn finish_closes_unterminated_directories() {
        let mut builder = TreeBuilder::new(PathBuf::from("/r"));
        builder.apply(&enter("/r", 0));
        builder.apply(&enter("/r/a", 1));
        builder.apply(&file("/r/a/x", 4));

        let tree = builder.finish();
        assert_eq!(tree.root_node().total_size, 4);
        assert_eq!(tree.root_node().file_count, 1);
    }
}
