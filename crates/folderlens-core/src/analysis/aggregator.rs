/// Streaming aggregation of file records.
///
/// The [`Aggregator`] is fed one [`FileRecord`] at a time during the walk and
/// keeps every running statistic the report needs. [`Aggregates::from_tree`]
/// computes the same statistics in one batch pass over a finished tree; the
/// two must agree exactly.
use crate::analysis::category::Category;
use crate::analysis::histogram::{ExtensionHistogram, SizeHistogram};
use crate::analysis::top_files::TopFiles;
use crate::config::ScanConfig;
use crate::model::{DirectoryTree, FileRecord};
use serde::Serialize;

/// Byte and file totals for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub byte_count: u64,
    pub file_count: u64,
}

/// Totals for every category of the closed set, `Other` included.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTotals {
    totals: [CategoryTotal; Category::COUNT],
}

impl CategoryTotals {
    pub fn record(&mut self, category: Category, size: u64) {
        let entry = &mut self.totals[category.index()];
        entry.byte_count += size;
        entry.file_count += 1;
    }

    pub fn get(&self, category: Category) -> CategoryTotal {
        self.totals[category.index()]
    }

    /// All nine categories in [`Category::ALL`] order, empty ones included.
    pub fn iter(&self) -> impl Iterator<Item = (Category, CategoryTotal)> + '_ {
        Category::ALL.iter().map(|&c| (c, self.get(c)))
    }

    /// Non-empty categories, largest byte count first.
    pub fn by_size(&self) -> Vec<(Category, CategoryTotal)> {
        let mut present: Vec<_> = self.iter().filter(|(_, t)| t.file_count > 0).collect();
        present.sort_by(|a, b| b.1.byte_count.cmp(&a.1.byte_count));
        present
    }

    pub fn total_bytes(&self) -> u64 {
        self.totals.iter().map(|t| t.byte_count).sum()
    }

    pub fn total_files(&self) -> u64 {
        self.totals.iter().map(|t| t.file_count).sum()
    }

    /// Share of all bytes held by `category`, in `[0, 1]`. Zero for an empty total.
    pub fn ratio(&self, category: Category) -> f64 {
        let total = self.total_bytes();
        if total == 0 {
            0.0
        } else {
            self.get(category).byte_count as f64 / total as f64
        }
    }

    /// The category holding the most bytes; earliest in `Category::ALL` on ties.
    pub fn dominant(&self) -> Option<Category> {
        self.iter()
            .filter(|(_, t)| t.file_count > 0)
            .fold(None, |best: Option<(Category, u64)>, (cat, t)| match best {
                Some((_, bytes)) if bytes >= t.byte_count => best,
                _ => Some((cat, t.byte_count)),
            })
            .map(|(cat, _)| cat)
    }
}

/// Everything the aggregator produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregates {
    pub categories: CategoryTotals,
    pub extensions: ExtensionHistogram,
    pub size_histogram: SizeHistogram,
    /// Largest files overall, largest first.
    pub largest_files: Vec<FileRecord>,
    /// Largest files per category, indexed by [`Category::index`].
    pub category_largest: Vec<Vec<FileRecord>>,
}

impl Aggregates {
    /// Batch re-derivation from a finished tree.
    pub fn from_tree(tree: &DirectoryTree, config: &ScanConfig) -> Self {
        let mut aggregator = Aggregator::new(config);
        for file in tree.files() {
            aggregator.record(file);
        }
        aggregator.finish()
    }

    pub fn largest_in(&self, category: Category) -> &[FileRecord] {
        &self.category_largest[category.index()]
    }
}

/// Running statistics, exclusively owned by the scan worker.
#[derive(Debug, Clone)]
pub struct Aggregator {
    categories: CategoryTotals,
    extensions: ExtensionHistogram,
    size_histogram: SizeHistogram,
    largest: TopFiles,
    category_largest: Vec<TopFiles>,
}

impl Aggregator {
    pub fn new(config: &ScanConfig) -> Self {
        Self {
            categories: CategoryTotals::default(),
            extensions: ExtensionHistogram::default(),
            size_histogram: SizeHistogram::new(&config.size_buckets),
            largest: TopFiles::new(config.top_n_files),
            category_largest: (0..Category::COUNT)
                .map(|_| TopFiles::new(config.top_n_files))
                .collect(),
        }
    }

    pub fn record(&mut self, file: &FileRecord) {
        let category = file.category();
        self.categories.record(category, file.size);
        self.extensions.record(&file.extension, file.size);
        self.size_histogram.record(file.size);
        self.largest.offer(file);
        self.category_largest[category.index()].offer(file);
    }

    pub fn finish(self) -> Aggregates {
        Aggregates {
            categories: self.categories,
            extensions: self.extensions,
            size_histogram: self.size_histogram,
            largest_files: self.largest.into_sorted_vec(),
            category_largest: self
                .category_largest
                .into_iter()
                .map(TopFiles::into_sorted_vec)
                .collect(),
        }
    }
}
