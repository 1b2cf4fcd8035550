/// Extension-frequency and size-distribution histograms.
use crate::analysis::category::{categorize, Category};
use crate::model::size::format_size;
use compact_str::CompactString;
use serde::Serialize;
use std::collections::BTreeMap;

/// Count and byte total for one extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionStats {
    pub file_count: u64,
    pub byte_count: u64,
}

/// Files and bytes per lowercase extension. The empty key means "no extension".
///
/// Backed by a `BTreeMap` so iteration order, and anything derived from it,
/// is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtensionHistogram {
    entries: BTreeMap<CompactString, ExtensionStats>,
}

impl ExtensionHistogram {
    pub fn record(&mut self, extension: &str, size: u64) {
        let entry = self.entries.entry(CompactString::new(extension)).or_default();
        entry.file_count += 1;
        entry.byte_count += size;
    }

    pub fn get(&self, extension: &str) -> Option<ExtensionStats> {
        self.entries.get(extension).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ExtensionStats)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// The `n` most frequent extensions by file count, ties by extension name.
    pub fn most_common(&self, n: usize) -> Vec<(String, ExtensionStats)> {
        self.most_common_where(n, |_| true)
    }

    /// Like [`most_common`](Self::most_common), restricted to one category.
    pub fn most_common_in(&self, category: Category, n: usize) -> Vec<(String, ExtensionStats)> {
        self.most_common_where(n, |ext| categorize(ext) == category)
    }

    fn most_common_where(
        &self,
        n: usize,
        keep: impl Fn(&str) -> bool,
    ) -> Vec<(String, ExtensionStats)> {
        let mut ranked: Vec<(&str, ExtensionStats)> =
            self.iter().filter(|(ext, _)| keep(ext)).collect();
        // Stable sort keeps the BTreeMap's alphabetical order among ties.
        ranked.sort_by(|a, b| b.1.file_count.cmp(&a.1.file_count));
        ranked
            .into_iter()
            .take(n)
            .map(|(ext, stats)| (display_extension(ext), stats))
            .collect()
    }
}

/// `.ext` for display, or `(no extension)`.
pub fn display_extension(ext: &str) -> String {
    if ext.is_empty() {
        "(no extension)".to_string()
    } else {
        format!(".{ext}")
    }
}

/// One bucket of the size distribution: sizes in `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeBucket {
    pub lower: u64,
    /// `None` for the open-ended last bucket.
    pub upper: Option<u64>,
    pub file_count: u64,
    pub byte_count: u64,
}

impl SizeBucket {
    pub fn label(&self) -> String {
        match (self.lower, self.upper) {
            (0, Some(upper)) => format!("< {}", format_size(upper)),
            (lower, Some(upper)) => format!("{} - {}", format_size(lower), format_size(upper)),
            (lower, None) => format!(">= {}", format_size(lower)),
        }
    }
}

/// Fixed-bucket histogram of file sizes.
///
/// `edges` are strictly increasing upper bounds; `k` edges produce `k + 1`
/// buckets, the last one open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeHistogram {
    edges: Vec<u64>,
    buckets: Vec<SizeBucket>,
}

impl SizeHistogram {
    pub fn new(edges: &[u64]) -> Self {
        let buckets = (0..=edges.len())
            .map(|i| SizeBucket {
                lower: if i == 0 { 0 } else { edges[i - 1] },
                upper: edges.get(i).copied(),
                file_count: 0,
                byte_count: 0,
            })
            .collect();
        Self {
            edges: edges.to_vec(),
            buckets,
        }
    }

    /// Index of the bucket that holds `size`.
    pub fn bucket_index(&self, size: u64) -> usize {
        self.edges.partition_point(|&edge| edge <= size)
    }

    pub fn record(&mut self, size: u64) {
        let idx = self.bucket_index(size);
        let bucket = &mut self.buckets[idx];
        bucket.file_count += 1;
        bucket.byte_count += size;
    }

    pub fn buckets(&self) -> &[SizeBucket] {
        &self.buckets
    }

    pub fn total_files(&self) -> u64 {
        self.buckets.iter().map(|b| b.file_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_histogram_counts_and_sums() {
        let mut hist = ExtensionHistogram::default();
        hist.record("rs", 10);
        hist.record("rs", 30);
        hist.record("", 5);

        assert_eq!(
            hist.get("rs"),
            Some(ExtensionStats {
                file_count: 2,
                byte_count: 40
            })
        );
        assert_eq!(hist.get("").map(|s| s.file_count), Some(1));
        assert_eq!(hist.len(), 2);
    }

    #[test]
    fn most_common_orders_by_count_then_name() {
        let mut hist = ExtensionHistogram::default();
        for ext in ["txt", "png", "png", "md", "md", "rs"] {
            hist.record(ext, 1);
        }
        let names: Vec<String> = hist.most_common(3).into_iter().map(|(e, _)| e).collect();
        assert_eq!(names, vec![".md", ".png", ".rs"]);
    }

    #[test]
    fn most_common_in_filters_by_category() {
        let mut hist = ExtensionHistogram::default();
        for ext in ["rs", "rs", "py", "png", ""] {
            hist.record(ext, 1);
        }
        let code: Vec<String> = hist
            .most_common_in(Category::Code, 5)
            .into_iter()
            .map(|(e, _)| e)
            .collect();
        assert_eq!(code, vec![".rs", ".py"]);
        let other = hist.most_common_in(Category::Other, 5);
        assert_eq!(other[0].0, "(no extension)");
    }

    #[test]
    fn size_buckets_are_half_open() {
        let mut hist = SizeHistogram::new(&[10, 100]);
        for size in [0, 9, 10, 99, 100, 5_000] {
            hist.record(size);
        }
        let counts: Vec<u64> = hist.buckets().iter().map(|b| b.file_count).collect();
        assert_eq!(counts, vec![2, 2, 2]);
        assert_eq!(hist.buckets()[2].byte_count, 5_100);
        assert_eq!(hist.total_files(), 6);
    }

    #[test]
    fn no_edges_means_one_bucket() {
        let mut hist = SizeHistogram::new(&[]);
        hist.record(42);
        assert_eq!(hist.buckets().len(), 1);
        assert_eq!(hist.buckets()[0].label(), ">= 0 B");
    }

    #[test]
    fn bucket_labels() {
        let hist = SizeHistogram::new(&[1024, 1_048_576]);
        let labels: Vec<String> = hist.buckets().iter().map(SizeBucket::label).collect();
        assert_eq!(labels, vec!["< 1.00 KB", "1.00 KB - 1.00 MB", ">= 1.00 MB"]);
    }
}
