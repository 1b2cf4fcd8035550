/// Analysis modules: streaming aggregation during the scan plus post-scan
/// views, insights and tools.
pub mod age;
pub mod aggregator;
pub mod category;
pub mod duplicates;
pub mod histogram;
pub mod insights;
pub mod search;
pub mod summary;
pub mod top_files;

pub use age::{find_stale_files, StaleFile};
pub use aggregator::{Aggregates, Aggregator, CategoryTotal, CategoryTotals};
pub use category::{categorize, Category};
pub use duplicates::{find_duplicates, DuplicateGroup};
pub use histogram::{ExtensionHistogram, ExtensionStats, SizeBucket, SizeHistogram};
pub use insights::{generate_insights, Insight, InsightKind, Severity};
pub use search::{search, SearchHit, SearchQuery};
pub use summary::{category_summary, folder_comparison, CategorySummary, FolderSize, Overview};
pub use top_files::{top_files, TopFiles};
