/// Data model for FolderLens.
///
/// Re-exports the arena-allocated directory tree and supporting types.
pub mod builder;
pub mod dir_node;
pub mod dir_tree;
pub mod file_record;
pub mod size;

pub use builder::TreeBuilder;
pub use dir_node::{DirectoryNode, NodeIndex};
pub use dir_tree::DirectoryTree;
pub use file_record::FileRecord;
