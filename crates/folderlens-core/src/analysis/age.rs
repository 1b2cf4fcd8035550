/// File age analysis: find stale files that haven't been modified recently.
use crate::model::{DirectoryTree, FileRecord};
use serde::Serialize;
use std::time::{Duration, SystemTime};

const SECS_PER_DAY: u64 = 24 * 3600;

/// A file not modified within the requested window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleFile {
    pub file: FileRecord,
    pub age_days: u64,
}

/// Files last modified at least `min_age_days` before `now`, largest first
/// (ties by path), at most `max_results` of them.
///
/// `now` is passed in so the result depends only on its inputs. Files
/// without a modification time, or with one in the future, are skipped.
pub fn find_stale_files(
    tree: &DirectoryTree,
    min_age_days: u64,
    max_results: usize,
    now: SystemTime,
) -> Vec<StaleFile> {
    // `max_results - 1` below would underflow.
    if max_results == 0 {
        return Vec::new();
    }

    let threshold = Duration::from_secs(min_age_days.saturating_mul(SECS_PER_DAY));

    let mut stale: Vec<StaleFile> = tree
        .files()
        .filter_map(|file| {
            let age = now.duration_since(file.modified?).ok()?;
            (age >= threshold).then(|| StaleFile {
                file: file.clone(),
                age_days: age.as_secs() / SECS_PER_DAY,
            })
        })
        .collect();

    let order = |a: &StaleFile, b: &StaleFile| {
        b.file
            .size
            .cmp(&a.file.size)
            .then_with(|| a.file.path.cmp(&b.file.path))
    };
    if stale.len() > max_results {
        stale.select_nth_unstable_by(max_results - 1, order);
        stale.truncate(max_results);
    }
    stale.sort_unstable_by(order);
    stale
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_000 * SECS_PER_DAY)
    }

    fn days_ago(days: u64) -> Option<SystemTime> {
        Some(now() - Duration::from_secs(days * SECS_PER_DAY + 1))
    }

    fn tree(files: &[(&str, u64, Option<SystemTime>)]) -> DirectoryTree {
        let mut tree = DirectoryTree::new(PathBuf::from("/r"));
        for &(name, size, modified) in files {
            let rec = FileRecord::new(PathBuf::from(format!("/r/{name}")), size, modified);
            tree.add_file(tree.root, rec);
        }
        tree.recompute_totals();
        tree
    }

    #[test]
    fn old_file_is_returned() {
        let tree = tree(&[("old.log", 500, days_ago(400))]);
        let result = find_stale_files(&tree, 365, 10, now());
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file.size, 500);
        assert_eq!(result[0].age_days, 400);
    }

    #[test]
    fn recent_file_is_excluded() {
        let tree = tree(&[("new.txt", 1024, days_ago(10))]);
        assert!(find_stale_files(&tree, 365, 10, now()).is_empty());
    }

    #[test]
    fn sorted_by_size_and_capped() {
        let files: Vec<(String, u64)> = (1..=5).map(|i| (format!("f{i}.bak"), i * 100)).collect();
        let borrowed: Vec<(&str, u64, Option<SystemTime>)> = files
            .iter()
            .map(|(n, s)| (n.as_str(), *s, days_ago(400)))
            .collect();
        let result = find_stale_files(&tree(&borrowed), 365, 2, now());
        let sizes: Vec<u64> = result.iter().map(|s| s.file.size).collect();
        assert_eq!(sizes, vec![500, 400]);
    }

    #[test]
    fn zero_max_results_is_empty() {
        let tree = tree(&[("old.log", 1024, days_ago(400))]);
        assert!(find_stale_files(&tree, 0, 0, now()).is_empty());
    }

    #[test]
    fn missing_or_future_timestamps_are_skipped() {
        let future = Some(now() + Duration::from_secs(60));
        let tree = tree(&[("no_time.bin", 999, None), ("future.bin", 5, future)]);
        assert!(find_stale_files(&tree, 0, 100, now()).is_empty());
    }
}
