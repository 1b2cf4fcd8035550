/// Top-N largest files, maintained incrementally.
///
/// A min-heap of at most N entries: while the heap is not full every file is
/// pushed; once full, a file replaces the current smallest entry only when it
/// ranks higher. Ranking is size descending, ties broken by path ascending,
/// so the result is independent of the order files arrive in.
use crate::model::FileRecord;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Heap entry. `Greater` means "ranks higher": bigger, or same size with a
/// smaller path.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Ranked(FileRecord);

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .size
            .cmp(&other.0.size)
            .then_with(|| other.0.path.cmp(&self.0.path))
    }
}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded collection of the N highest-ranked files.
#[derive(Debug, Clone)]
pub struct TopFiles {
    capacity: usize,
    heap: BinaryHeap<Reverse<Ranked>>,
}

impl TopFiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1).min(1024)),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Offer a file. Cloned only when it makes the cut.
    pub fn offer(&mut self, record: &FileRecord) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Reverse(Ranked(record.clone())));
            return;
        }
        let beats_smallest = match self.heap.peek() {
            Some(Reverse(smallest)) => {
                record.size > smallest.0.size
                    || (record.size == smallest.0.size && record.path < smallest.0.path)
            }
            None => true,
        };
        if beats_smallest {
            self.heap.pop();
            self.heap.push(Reverse(Ranked(record.clone())));
        }
    }

    /// Entries ordered largest first.
    pub fn to_sorted_vec(&self) -> Vec<FileRecord> {
        let mut ranked: Vec<&Ranked> = self.heap.iter().map(|Reverse(r)| r).collect();
        ranked.sort_unstable_by(|a, b| b.cmp(a));
        ranked.into_iter().map(|r| r.0.clone()).collect()
    }

    pub fn into_sorted_vec(self) -> Vec<FileRecord> {
        // `BinaryHeap::into_sorted_vec` is ascending by `Reverse<_>`, i.e.
        // highest-ranked first.
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Reverse(r)| r.0)
            .collect()
    }
}

/// Batch computation: the `n` highest-ranked files of `files`.
pub fn top_files<'a>(files: impl IntoIterator<Item = &'a FileRecord>, n: usize) -> Vec<FileRecord> {
    let mut top = TopFiles::new(n);
    for file in files {
        top.offer(file);
    }
    top.into_sorted_vec()
}
