/// Derived views over a finished scan: percentages, per-category summaries,
/// folder comparison and per-folder dominant categories.
use crate::analysis::aggregator::{Aggregates, CategoryTotals};
use crate::analysis::category::Category;
use crate::analysis::histogram::ExtensionStats;
use crate::model::size::format_size;
use crate::model::{DirectoryTree, FileRecord, NodeIndex};
use serde::Serialize;
use std::time::Duration;

/// Extensions listed per category summary.
pub const SUMMARY_TOP_EXTENSIONS: usize = 5;
/// Largest files listed per category summary.
pub const SUMMARY_TOP_FILES: usize = 5;
/// Subfolders listed in the folder comparison.
pub const FOLDER_COMPARISON_LIMIT: usize = 10;
/// Extensions listed in the extension distribution.
pub const EXTENSION_DISTRIBUTION_LIMIT: usize = 15;

/// Percentage (0-100) of all bytes per non-empty category, largest first.
pub fn category_percentages(totals: &CategoryTotals) -> Vec<(Category, f64)> {
    totals
        .by_size()
        .into_iter()
        .map(|(cat, _)| (cat, totals.ratio(cat) * 100.0))
        .collect()
}

/// Everything shown for a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub file_count: u64,
    pub total_size: u64,
    /// Share of all bytes, rounded to one decimal.
    pub percentage: f64,
    pub top_extensions: Vec<(String, ExtensionStats)>,
    pub largest_files: Vec<FileRecord>,
    pub description: &'static str,
}

pub fn category_summary(aggregates: &Aggregates, category: Category) -> CategorySummary {
    let total = aggregates.categories.get(category);
    let percentage = (aggregates.categories.ratio(category) * 1000.0).round() / 10.0;
    CategorySummary {
        category,
        file_count: total.file_count,
        total_size: total.byte_count,
        percentage,
        top_extensions: aggregates
            .extensions
            .most_common_in(category, SUMMARY_TOP_EXTENSIONS),
        largest_files: aggregates
            .largest_in(category)
            .iter()
            .take(SUMMARY_TOP_FILES)
            .cloned()
            .collect(),
        description: category.description(),
    }
}

/// One direct subfolder of the root, for side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderSize {
    pub index: NodeIndex,
    pub name: String,
    pub total_size: u64,
    pub file_count: u64,
}

/// The largest direct subfolders of the root.
pub fn folder_comparison(tree: &DirectoryTree, limit: usize) -> Vec<FolderSize> {
    tree.children_sorted_by_size(tree.root)
        .into_iter()
        .take(limit)
        .map(|idx| {
            let node = tree.node(idx);
            FolderSize {
                index: idx,
                name: node.name.to_string(),
                total_size: node.total_size,
                file_count: node.file_count,
            }
        })
        .collect()
}

/// Category holding the most bytes at or below `dir`, or `None` if it has no files.
pub fn dominant_category_of(tree: &DirectoryTree, dir: NodeIndex) -> Option<Category> {
    let mut totals = CategoryTotals::default();
    for file in tree.files_under(dir) {
        totals.record(file.category(), file.size);
    }
    totals.dominant()
}

/// Headline numbers for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_files: u64,
    pub total_folders: u64,
    pub total_size: u64,
    pub categories_present: usize,
    pub duration: Duration,
}

impl Overview {
    pub fn new(tree: &DirectoryTree, totals: &CategoryTotals, duration: Duration) -> Self {
        let root = tree.root_node();
        Self {
            total_files: root.file_count,
            total_folders: root.dir_count,
            total_size: root.total_size,
            categories_present: totals.by_size().len(),
            duration,
        }
    }

    pub fn size_display(&self) -> String {
        format_size(self.total_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use std::path::PathBuf;

    fn sample() -> (DirectoryTree, Aggregates) {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        let photos = tree.add_dir(tree.root, PathBuf::from("/r/photos"));
        let src = tree.add_dir(tree.root, PathBuf::from("/r/src"));
        for (dir, name, size) in [
            (photos, "/r/photos/a.jpg", 600),
            (photos, "/r/photos/b.png", 200),
            (src, "/r/src/main.rs", 150),
            (src, "/r/src/lib.rs", 40),
            (tree.root, "/r/readme.md", 10),
        ] {
            tree.add_file(dir, FileRecord::new(PathBuf::from(name), size, None));
        }
        tree.recompute_totals();
        let aggregates = Aggregates::from_tree(&tree, &ScanConfig::default());
        (tree, aggregates)
    }

    #[test]
    fn percentages_sum_to_hundred() {
        let (_, agg) = sample();
        let pcts = category_percentages(&agg.categories);
        assert_eq!(pcts[0].0, Category::Images);
        let sum: f64 = pcts.iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn category_summary_lists_extensions_and_files() {
        let (_, agg) = sample();
        let summary = category_summary(&agg, Category::Code);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_size, 190);
        assert_eq!(summary.percentage, 19.0);
        assert_eq!(summary.top_extensions[0].0, ".rs");
        assert_eq!(summary.largest_files[0].size, 150);
        assert!(!summary.description.is_empty());
    }

    #[test]
    fn empty_category_summary() {
        let (_, agg) = sample();
        let summary = category_summary(&agg, Category::Audio);
        assert_eq!(summary.file_count, 0);
        assert_eq!(summary.percentage, 0.0);
        assert!(summary.largest_files.is_empty());
    }

    #[test]
    fn folder_comparison_is_sorted_and_limited() {
        let (tree, _) = sample();
        let folders = folder_comparison(&tree, 1);
        assert_eq!(folders.len(), 1);
        assert_eq!(folders[0].name, "photos");
        assert_eq!(folders[0].total_size, 800);
    }

    #[test]
    fn dominant_category_per_folder() {
        let (tree, _) = sample();
        let src = tree.find(std::path::Path::new("/r/src")).unwrap();
        assert_eq!(dominant_category_of(&tree, src), Some(Category::Code));
        assert_eq!(dominant_category_of(&tree, tree.root), Some(Category::Images));
    }

    #[test]
    fn overview_counts() {
        let (tree, agg) = sample();
        let overview = Overview::new(&tree, &agg.categories, Duration::from_millis(5));
        assert_eq!(overview.total_files, 5);
        assert_eq!(overview.total_folders, 2);
        assert_eq!(overview.total_size, 1000);
        assert_eq!(overview.categories_present, 3);
        assert_eq!(overview.size_display(), "1000 B");
    }
}
