/// Likely-duplicate detection.
///
/// Files are grouped by `(size, lowercase file name)`. Nothing is read from
/// disk, so a group is a candidate set rather than proof of identical
/// content.
use crate::model::{DirectoryTree, FileRecord};
use serde::Serialize;
use std::collections::BTreeMap;

/// Files that share a size and a case-insensitive name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Size of each file in the group.
    pub size: u64,
    /// Lowercase name shared by the group.
    pub name: String,
    /// Members, ordered by path.
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Bytes that would be freed by keeping a single copy.
    pub fn wasted_bytes(&self) -> u64 {
        self.size * (self.files.len() as u64).saturating_sub(1)
    }
}

/// Find candidate duplicate groups, most wasted space first.
pub fn find_duplicates(tree: &DirectoryTree) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<(u64, String), Vec<&FileRecord>> = BTreeMap::new();
    for file in tree.files() {
        groups
            .entry((file.size, file.name().to_lowercase()))
            .or_default()
            .push(file);
    }

    let mut duplicates: Vec<DuplicateGroup> = groups
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|((size, name), files)| {
            let mut files: Vec<FileRecord> = files.into_iter().cloned().collect();
            files.sort_by(|a, b| a.path.cmp(&b.path));
            DuplicateGroup { size, name, files }
        })
        .collect();

    // Stable: equal waste keeps the map's (size, name) order.
    duplicates.sort_by(|a, b| b.wasted_bytes().cmp(&a.wasted_bytes()));
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn tree(files: &[(&str, &str, u64)]) -> DirectoryTree {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        let a = tree.add_dir(tree.root, PathBuf::from("/r/a"));
        let b = tree.add_dir(tree.root, PathBuf::from("/r/b"));
        for &(dir, name, size) in files {
            let idx = if dir == "a" { a } else { b };
            let path = PathBuf::from(format!("/r/{dir}/{name}"));
            tree.add_file(idx, FileRecord::new(path, size, None));
        }
        tree.recompute_totals();
        tree
    }

    #[test]
    fn same_size_and_name_are_grouped() {
        let tree = tree(&[("a", "photo.jpg", 500), ("b", "PHOTO.JPG", 500), ("b", "other.jpg", 500)]);
        let groups = find_duplicates(&tree);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "photo.jpg");
        assert_eq!(groups[0].files.len(), 2);
        assert_eq!(groups[0].files[0].path, PathBuf::from("/r/a/photo.jpg"));
        assert_eq!(groups[0].wasted_bytes(), 500);
    }

    #[test]
    fn different_sizes_are_not_duplicates() {
        let tree = tree(&[("a", "x.bin", 1), ("b", "x.bin", 2)]);
        assert!(find_duplicates(&tree).is_empty());
    }

    #[test]
    fn groups_ordered_by_wasted_space() {
        let tree = tree(&[
            ("a", "small.txt", 10),
            ("b", "small.txt", 10),
            ("a", "big.iso", 9_000),
            ("b", "big.iso", 9_000),
        ]);
        let names: Vec<String> = find_duplicates(&tree).into_iter().map(|g| g.name).collect();
        assert_eq!(names, vec!["big.iso", "small.txt"]);
    }
}
