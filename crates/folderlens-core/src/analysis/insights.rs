/// Heuristic insights derived from a finished scan.
///
/// Rules run in a fixed order and each one emits on its own; one rule
/// firing never suppresses another. Nothing here reads the clock or any
/// other ambient state, so the same tree always yields the same insights.
///
/// | # | Rule              | Severity | Fires when                                               |
/// |---|-------------------|----------|----------------------------------------------------------|
/// | 1 | EmptyFolder       | info     | the root holds no files                                  |
/// | 2 | DominantCategory  | info     | one category's share of bytes exceeds the ratio          |
/// | 3 | LargeFile         | warning  | a file is larger than the threshold (one per file)       |
/// | 4 | ManySmallFiles    | info     | a crowded category has a small average file size         |
/// | 5 | UnreadableEntry   | warning  | an entry failed with an I/O error (one per entry)        |
use crate::analysis::aggregator::CategoryTotals;
use crate::analysis::category::Category;
use crate::config::InsightConfig;
use crate::error::{Diagnostic, DiagnosticKind};
use crate::model::size::{format_count, format_size};
use crate::model::{DirectoryTree, FileRecord};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Info,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InsightKind {
    EmptyFolder,
    DominantCategory(Category),
    LargeFile,
    ManySmallFiles(Category),
    UnreadableEntry,
}

/// A generated, read-only observation about the scanned folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub severity: Severity,
    pub kind: InsightKind,
    pub message: String,
    pub related_path: Option<PathBuf>,
}

impl Insight {
    fn info(kind: InsightKind, message: String) -> Self {
        Self {
            severity: Severity::Info,
            kind,
            message,
            related_path: None,
        }
    }

    fn warning(kind: InsightKind, message: String, path: PathBuf) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message,
            related_path: Some(path),
        }
    }
}

/// Run every rule in order and collect what fires.
pub fn generate_insights(
    tree: &DirectoryTree,
    totals: &CategoryTotals,
    diagnostics: &[Diagnostic],
    config: &InsightConfig,
) -> Vec<Insight> {
    let mut insights = Vec::new();
    insights.extend(empty_folder(tree));
    insights.extend(dominant_category(tree, totals, config));
    insights.extend(large_files(tree, config));
    insights.extend(many_small_files(totals, config));
    insights.extend(unreadable_entries(diagnostics));
    insights
}

/// Rule 1.
pub fn empty_folder(tree: &DirectoryTree) -> Option<Insight> {
    let root = tree.root_node();
    (root.file_count == 0).then(|| {
        let message = if root.dir_count == 0 {
            "This folder is empty.".to_string()
        } else {
            format!(
                "This folder is empty or contains only subdirectories ({} folders, no files).",
                format_count(root.dir_count)
            )
        };
        Insight::info(InsightKind::EmptyFolder, message)
    })
}

/// Rule 2. The ratio is measured against the root's total size.
pub fn dominant_category(
    tree: &DirectoryTree,
    totals: &CategoryTotals,
    config: &InsightConfig,
) -> Vec<Insight> {
    let total = tree.root_node().total_size;
    if total == 0 {
        return Vec::new();
    }
    totals
        .iter()
        .filter_map(|(category, t)| {
            let ratio = t.byte_count as f64 / total as f64;
            (ratio > config.dominant_category_ratio).then(|| {
                Insight::info(
                    InsightKind::DominantCategory(category),
                    format!(
                        "Dominant category: {} files occupy {:.1}% of the total storage ({}).",
                        category.label(),
                        ratio * 100.0,
                        format_size(t.byte_count)
                    ),
                )
            })
        })
        .collect()
}

/// Rule 3. Largest first, ties by path.
pub fn large_files(tree: &DirectoryTree, config: &InsightConfig) -> Vec<Insight> {
    let mut large: Vec<&FileRecord> = tree
        .files()
        .filter(|f| f.size > config.large_file_threshold_bytes)
        .collect();
    large.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.path.cmp(&b.path)));
    large
        .into_iter()
        .map(|f| {
            Insight::warning(
                InsightKind::LargeFile,
                format!(
                    "Large file detected: '{}' is {}. Consider archiving or moving it if it is not frequently accessed.",
                    f.name(),
                    format_size(f.size)
                ),
                f.path.clone(),
            )
        })
        .collect()
}

/// Rule 4.
pub fn many_small_files(totals: &CategoryTotals, config: &InsightConfig) -> Vec<Insight> {
    totals
        .iter()
        .filter(|(_, t)| {
            t.file_count > config.many_small_files_count
                && t.byte_count / t.file_count < config.small_file_average_bytes
        })
        .map(|(category, t)| {
            Insight::info(
                InsightKind::ManySmallFiles(category),
                format!(
                    "Many small files: {} {} files averaging {}. Consider consolidating or archiving them.",
                    format_count(t.file_count),
                    category.label().to_lowercase(),
                    format_size(t.byte_count / t.file_count)
                ),
            )
        })
        .collect()
}

/// Rule 5. Permission-denied and symlink diagnostics are reported as
/// diagnostics only.
pub fn unreadable_entries(diagnostics: &[Diagnostic]) -> Vec<Insight> {
    diagnostics
        .iter()
        .filter(|d| d.kind == DiagnosticKind::Io)
        .map(|d| {
            Insight::warning(
                InsightKind::UnreadableEntry,
                format!("Could not read '{}': {}", d.path.display(), d.message),
                d.path.clone(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_with(files: &[(&str, u64)]) -> (DirectoryTree, CategoryTotals) {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        let mut totals = CategoryTotals::default();
        for &(name, size) in files {
            let rec = FileRecord::new(PathBuf::from(format!("/r/{name}")), size, None);
            totals.record(rec.category(), size);
            tree.add_file(tree.root, rec);
        }
        tree.recompute_totals();
        (tree, totals)
    }

    fn code_and_data(code_bytes: u64, data_bytes: u64) -> (DirectoryTree, CategoryTotals) {
        let per_code = code_bytes / 9;
        let mut files: Vec<(String, u64)> = (0..9).map(|i| (format!("m{i}.rs"), per_code)).collect();
        files.push(("d.json".to_string(), data_bytes));
        let borrowed: Vec<(&str, u64)> = files.iter().map(|(n, s)| (n.as_str(), *s)).collect();
        tree_with(&borrowed)
    }

    #[test]
    fn dominant_code_fires_once() {
        let (tree, totals) = code_and_data(900, 100);
        let insights = generate_insights(&tree, &totals, &[], &InsightConfig::default());
        let dominant: Vec<_> = insights
            .iter()
            .filter(|i| matches!(i.kind, InsightKind::DominantCategory(_)))
            .collect();
        assert_eq!(dominant.len(), 1);
        assert_eq!(dominant[0].kind, InsightKind::DominantCategory(Category::Code));
        assert!(dominant[0].message.contains("Code"));
        assert_eq!(insights.len(), 1);
    }

    #[test]
    fn balanced_split_has_no_dominant_category() {
        let (tree, totals) = code_and_data(504, 504);
        let insights = dominant_category(&tree, &totals, &InsightConfig::default());
        assert!(insights.is_empty());
    }

    #[test]
    fn ratio_exactly_at_threshold_does_not_fire() {
        let (tree, totals) = tree_with(&[("a.rs", 80), ("b.json", 20)]);
        assert!(dominant_category(&tree, &totals, &InsightConfig::default()).is_empty());
    }

    #[test]
    fn empty_folder_rule() {
        let tree = DirectoryTree::new(PathBuf::from("/r"));
        let insights = generate_insights(&tree, &CategoryTotals::default(), &[], &InsightConfig::default());
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::EmptyFolder);
        assert_eq!(insights[0].severity, Severity::Info);
    }

    #[test]
    fn empty_folder_with_subdirectories_mentions_them() {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        tree.add_dir(tree.root, PathBuf::from("/r/a"));
        tree.recompute_totals();
        let insight = empty_folder(&tree).unwrap();
        assert!(insight.message.contains("only subdirectories"));
    }

    #[test]
    fn large_files_are_warnings_ordered_by_size() {
        let config = InsightConfig {
            large_file_threshold_bytes: 100,
            ..InsightConfig::default()
        };
        let (tree, _) = tree_with(&[("small.bin", 100), ("big.iso", 500), ("bigger.iso", 900)]);
        let insights = large_files(&tree, &config);

        assert_eq!(insights.len(), 2, "threshold is exclusive");
        assert!(insights.iter().all(|i| i.severity == Severity::Warning));
        assert_eq!(insights[0].related_path, Some(PathBuf::from("/r/bigger.iso")));
        assert_eq!(insights[1].related_path, Some(PathBuf::from("/r/big.iso")));
    }

    #[test]
    fn rules_fire_independently() {
        let config = InsightConfig {
            large_file_threshold_bytes: 800,
            ..InsightConfig::default()
        };
        let (tree, totals) = tree_with(&[("movie.mp4", 900), ("note.txt", 10)]);
        let diags = vec![Diagnostic::new(DiagnosticKind::Io, "/r/broken", "bad sector")];
        let insights = generate_insights(&tree, &totals, &diags, &config);

        let kinds: Vec<InsightKind> = insights.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                InsightKind::DominantCategory(Category::Video),
                InsightKind::LargeFile,
                InsightKind::UnreadableEntry,
            ]
        );
    }

    #[test]
    fn many_small_files_rule() {
        let config = InsightConfig {
            many_small_files_count: 3,
            small_file_average_bytes: 50,
            ..InsightConfig::default()
        };
        let mut totals = CategoryTotals::default();
        for _ in 0..4 {
            totals.record(Category::Images, 10);
        }
        totals.record(Category::Video, 1);
        let insights = many_small_files(&totals, &config);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::ManySmallFiles(Category::Images));
    }

    #[test]
    fn only_io_diagnostics_become_insights() {
        let diags = vec![
            Diagnostic::new(DiagnosticKind::PermissionDenied, "/r/secret", "denied"),
            Diagnostic::new(DiagnosticKind::SymlinkSkipped, "/r/link", "link"),
            Diagnostic::new(DiagnosticKind::Io, "/r/bad", "boom"),
        ];
        let insights = unreadable_entries(&diags);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].related_path, Some(PathBuf::from("/r/bad")));
    }

    #[test]
    fn generation_is_deterministic() {
        let (tree, totals) = code_and_data(900, 100);
        let config = InsightConfig::default();
        assert_eq!(
            generate_insights(&tree, &totals, &[], &config),
            generate_insights(&tree, &totals, &[], &config)
        );
    }
}
