/// Scanner module: orchestrates a folder scan.
///
/// A scan is a single pass over the walker's event stream. Each event is fed
/// to the [`TreeBuilder`] and every file to the [`Aggregator`]; both are
/// owned exclusively by the thread running the scan. When the walk finishes
/// the insight rules run over the finished tree and everything is packaged
/// into a [`ScanReport`].
///
/// [`run_scan`] is the synchronous body. [`start_scan`] runs it on a named
/// background thread and streams [`ScanProgress`] over a bounded channel.
pub mod progress;
pub mod walker;

use crate::analysis::aggregator::{Aggregates, Aggregator};
use crate::analysis::category::Category;
use crate::analysis::insights::{generate_insights, Insight};
use crate::analysis::summary::{self, CategorySummary, Overview};
use crate::config::ScanConfig;
use crate::error::{Diagnostic, ScanError};
use crate::model::{DirectoryTree, TreeBuilder};
use progress::{ProgressThrottle, ScanCounters, ScanProgress};
use walker::WalkEvent;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Maximum number of progress messages that may queue up in the channel.
///
/// Updates are sent with `try_send` and dropped when the channel is full, so
/// a slow consumer never stalls the walk.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Everything a finished scan produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub root: PathBuf,
    pub tree: DirectoryTree,
    pub aggregates: Aggregates,
    pub insights: Vec<Insight>,
    pub diagnostics: Vec<Diagnostic>,
    pub duration: Duration,
}

impl ScanReport {
    pub fn overview(&self) -> Overview {
        Overview::new(&self.tree, &self.aggregates.categories, self.duration)
    }

    pub fn category_summary(&self, category: Category) -> CategorySummary {
        summary::category_summary(&self.aggregates, category)
    }
}

/// How a scan ended.
#[derive(Debug)]
pub enum ScanOutcome {
    Completed(ScanReport),
    Cancelled,
    Failed(ScanError),
}

impl ScanOutcome {
    fn into_message(self) -> ScanProgress {
        match self {
            Self::Completed(report) => ScanProgress::Complete(Box::new(report)),
            Self::Cancelled => ScanProgress::Cancelled,
            Self::Failed(err) => ScanProgress::Failed(err),
        }
    }

    /// The outcome carried by a terminal message; `None` for updates.
    pub fn from_progress(message: ScanProgress) -> Option<Self> {
        match message {
            ScanProgress::Update { .. } => None,
            ScanProgress::Complete(report) => Some(Self::Completed(*report)),
            ScanProgress::Cancelled => Some(Self::Cancelled),
            ScanProgress::Failed(err) => Some(Self::Failed(err)),
        }
    }
}

/// Scan `root` on the calling thread.
///
/// Progress updates go to `progress_tx` when one is given; terminal messages
/// are left to the caller.
pub fn run_scan(
    root: &Path,
    config: &ScanConfig,
    cancel: &Arc<AtomicBool>,
    progress_tx: Option<&Sender<ScanProgress>>,
) -> ScanOutcome {
    let start = Instant::now();
    info!("Starting scan of {}", root.display());

    let mut walk = match walker::walk(root, config, Arc::clone(cancel)) {
        Ok(walk) => walk,
        Err(err) => {
            warn!("Scan of {} failed: {err}", root.display());
            return ScanOutcome::Failed(err);
        }
    };

    let mut builder = TreeBuilder::new(root.to_path_buf());
    let mut aggregator = Aggregator::new(config);
    let mut diagnostics = Vec::new();
    let mut counters = ScanCounters::default();
    let mut throttle = ProgressThrottle::from_config(config);
    let mut dropped_updates: u64 = 0;

    for event in walk.by_ref() {
        match &event {
            WalkEvent::EnterDir { path, depth } => {
                if *depth > 0 {
                    counters.dirs_scanned += 1;
                }
                counters.current_path.clone_from(path);
            }
            WalkEvent::File(record) => {
                aggregator.record(record);
                counters.files_scanned += 1;
                counters.bytes_scanned += record.size;
            }
            WalkEvent::ExitDir { .. } => {}
            WalkEvent::Skipped(diag) => diagnostics.push(diag.clone()),
        }
        builder.apply(&event);

        if matches!(event, WalkEvent::File(_) | WalkEvent::EnterDir { .. }) && throttle.tick() {
            if let Some(tx) = progress_tx {
                if let Err(TrySendError::Full(_)) = tx.try_send(counters.to_update()) {
                    dropped_updates += 1;
                    trace!("progress channel full, update dropped");
                }
            }
        }
    }

    if walk.was_cancelled() {
        info!(
            "Scan of {} cancelled after {} files",
            root.display(),
            counters.files_scanned
        );
        return ScanOutcome::Cancelled;
    }

    if let Some(tx) = progress_tx {
        let _ = tx.try_send(counters.to_update());
    }

    let tree = builder.finish();
    let aggregates = aggregator.finish();
    let insights = generate_insights(
        &tree,
        &aggregates.categories,
        &diagnostics,
        &config.insight_config(),
    );
    let duration = start.elapsed();

    debug!(
        "Walk stats: {} files, {} dirs, {} bytes, {} diagnostics, {} dropped updates",
        counters.files_scanned,
        counters.dirs_scanned,
        counters.bytes_scanned,
        diagnostics.len(),
        dropped_updates
    );
    info!(
        "Scan of {} complete in {duration:?}: {} files, {} insights",
        root.display(),
        counters.files_scanned,
        insights.len()
    );

    ScanOutcome::Completed(ScanReport {
        root: root.to_path_buf(),
        tree,
        aggregates,
        insights,
        diagnostics,
        duration,
    })
}

/// Scan `root` on the calling thread without progress or cancellation.
pub fn scan_folder(root: &Path, config: &ScanConfig) -> ScanOutcome {
    run_scan(root, config, &Arc::new(AtomicBool::new(false)), None)
}

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan ends and return its outcome.
    ///
    /// Progress updates still queued are discarded.
    pub fn wait(mut self) -> ScanOutcome {
        let outcome = self
            .progress_rx
            .iter()
            .find_map(ScanOutcome::from_progress);
        self.join_worker();
        outcome.unwrap_or(ScanOutcome::Failed(ScanError::WorkerPanicked))
    }

    /// Cancel the scan and block until the worker thread has exited.
    ///
    /// Dropping the handle does the same.
    pub fn cancel_and_wait(mut self) {
        self.stop_worker();
    }

    fn stop_worker(&mut self) {
        if self.thread.is_none() {
            return;
        }
        self.cancel();
        // Drain so a worker blocked on a full channel can finish.
        for _ in self.progress_rx.iter() {}
        self.join_worker();
    }

    fn join_worker(&mut self) {
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("scanner thread panicked");
            }
        }
    }
}

impl Drop for ScanHandle {
    /// A dropped handle no longer wants results; the worker is stopped and
    /// joined before the drop returns.
    fn drop(&mut self) {
        self.stop_worker();
    }
}

/// Start a new scan on a background thread.
///
/// Returns a [`ScanHandle`] for receiving progress and requesting
/// cancellation. Exactly one terminal message follows the updates.
pub fn start_scan(root: PathBuf, config: ScanConfig) -> Result<ScanHandle, ScanError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = Arc::clone(&cancel_flag);

    let thread = thread::Builder::new()
        .name("folderlens-scanner".into())
        .spawn(move || {
            let outcome = run_scan(&root, &config, &cancel_clone, Some(&progress_tx));
            // The receiver is gone if the handle was dropped.
            let _ = progress_tx.send(outcome.into_message());
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        thread: Some(thread),
    })
}

/// Owner of at most one active scan.
///
/// Starting a new scan cancels the previous one and waits for its worker to
/// exit, so two scans never run at once.
#[derive(Default)]
pub struct ScanSession {
    current: Option<ScanHandle>,
}

impl ScanSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, root: PathBuf, config: ScanConfig) -> Result<&ScanHandle, ScanError> {
        self.cancel();
        let handle = start_scan(root, config)?;
        Ok(self.current.insert(handle))
    }

    pub fn handle(&self) -> Option<&ScanHandle> {
        self.current.as_ref()
    }

    /// Take ownership of the active scan, e.g. to [`ScanHandle::wait`] on it.
    pub fn take(&mut self) -> Option<ScanHandle> {
        self.current.take()
    }

    /// Cancel the active scan, if any, and wait for it to stop.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.current.take() {
            handle.cancel_and_wait();
        }
    }
}
