/// Scan progress reporting: lightweight messages sent from the scan thread
/// to the consumer via a crossbeam channel.
use super::ScanReport;
use crate::config::ScanConfig;
use crate::error::ScanError;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Messages sent from the scan thread.
///
/// Any number of `Update`s is followed by exactly one terminal message.
#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        current_path: PathBuf,
        files_scanned: u64,
        bytes_scanned: u64,
        dirs_scanned: u64,
    },
    /// Scanning completed; the report owns the finished tree.
    Complete(Box<ScanReport>),
    /// The root could not be scanned at all.
    Failed(ScanError),
    /// Scan was cancelled before it finished.
    Cancelled,
}

impl ScanProgress {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Update { .. })
    }
}

/// Running counters reported in [`ScanProgress::Update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCounters {
    pub files_scanned: u64,
    pub bytes_scanned: u64,
    /// Directories below the root.
    pub dirs_scanned: u64,
    pub current_path: PathBuf,
}

impl ScanCounters {
    pub fn to_update(&self) -> ScanProgress {
        ScanProgress::Update {
            current_path: self.current_path.clone(),
            files_scanned: self.files_scanned,
            bytes_scanned: self.bytes_scanned,
            dirs_scanned: self.dirs_scanned,
        }
    }
}

/// Decides when the next progress update is due: after `interval` has
/// elapsed or after `every` records, whichever comes first.
#[derive(Debug)]
pub struct ProgressThrottle {
    interval: Duration,
    every: u64,
    last: Instant,
    since_last: u64,
}

impl ProgressThrottle {
    pub fn new(interval: Duration, every: u64) -> Self {
        Self {
            interval,
            every,
            last: Instant::now(),
            since_last: 0,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.progress_interval(), config.progress_throttle_records)
    }

    /// Count one record and report whether an update should be sent now.
    pub fn tick(&mut self) -> bool {
        self.since_last += 1;
        let due = (self.every > 0 && self.since_last >= self.every)
            || self.last.elapsed() >= self.interval;
        if due {
            self.since_last = 0;
            self.last = Instant::now();
        }
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_every_n_records() {
        let mut throttle = ProgressThrottle::new(Duration::from_secs(3600), 3);
        let fired: Vec<bool> = (0..7).map(|_| throttle.tick()).collect();
        assert_eq!(fired, vec![false, false, true, false, false, true, false]);
    }

    #[test]
    fn zero_interval_fires_every_time() {
        let mut throttle = ProgressThrottle::new(Duration::ZERO, 0);
        assert!(throttle.tick());
        assert!(throttle.tick());
    }

    #[test]
    fn update_carries_counters() {
        let counters = ScanCounters {
            files_scanned: 2,
            bytes_scanned: 30,
            dirs_scanned: 1,
            current_path: PathBuf::from("/r/a"),
        };
        let update = counters.to_update();
        assert!(!update.is_terminal());
        assert!(matches!(
            update,
            ScanProgress::Update { files_scanned: 2, bytes_scanned: 30, .. }
        ));
        assert!(ScanProgress::Cancelled.is_terminal());
    }
}
