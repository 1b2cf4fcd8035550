/// Depth-first directory walker built on `jwalk`.
///
/// `jwalk` runs with serial parallelism and sorted children, so two walks of
/// an unchanged tree produce the same event sequence. It yields a flat,
/// pre-order stream of entries tagged with their depth; [`Walk`] turns that
/// into explicit enter/exit events by keeping a stack of open directories
/// and closing every directory deeper than the next entry.
///
/// Per-entry failures never stop the walk. They surface as
/// [`WalkEvent::Skipped`] diagnostics in stream order.
use crate::config::ScanConfig;
use crate::error::{Diagnostic, DiagnosticKind, ScanError};
use crate::model::FileRecord;
use std::collections::VecDeque;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

type Entry = jwalk::DirEntry<((), ())>;
type EntryIter = Box<dyn Iterator<Item = Result<Entry, jwalk::Error>>>;

/// One step of a walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// A directory is about to be traversed. The root has depth 0.
    EnterDir { path: PathBuf, depth: usize },
    /// A non-directory entry inside the innermost open directory.
    File(FileRecord),
    /// Every entry under `path` has been reported.
    ExitDir { path: PathBuf },
    /// An entry that could not be read or was deliberately not traversed.
    Skipped(Diagnostic),
}

/// Check the root and start a walk under it.
///
/// The only errors returned here are the fatal ones; everything found while
/// walking is reported through the iterator.
pub fn walk(root: &Path, config: &ScanConfig, cancel: Arc<AtomicBool>) -> Result<Walk, ScanError> {
    validate_root(root)?;

    let excluded: Vec<OsString> = config.exclude_names.iter().map(OsString::from).collect();
    let walker = jwalk::WalkDir::new(root)
        .parallelism(jwalk::Parallelism::Serial)
        .sort(true)
        .skip_hidden(config.skip_hidden)
        .follow_links(config.follow_symlinks)
        .process_read_dir(move |depth, _path, _state, children| {
            // `None` is the root's own entry list; only its descendants are filtered.
            if depth.is_none() || excluded.is_empty() {
                return;
            }
            children.retain(|child| match child {
                Ok(entry) => !excluded.contains(&entry.file_name),
                Err(_) => true,
            });
        });

    Ok(Walk {
        entries: Some(Box::new(walker.into_iter())),
        pending: VecDeque::new(),
        open: Vec::new(),
        cancel,
        cancelled: false,
        follow_links: config.follow_symlinks,
    })
}

fn validate_root(root: &Path) -> Result<(), ScanError> {
    let meta = fs::metadata(root).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => ScanError::PathNotFound(root.to_path_buf()),
        _ => ScanError::RootUnreadable {
            path: root.to_path_buf(),
            source: err,
        },
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    fs::read_dir(root).map_err(|source| ScanError::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Lazy stream of [`WalkEvent`]s.
///
/// Every `EnterDir` is matched by an `ExitDir`, including when the walk is
/// cancelled part-way.
pub struct Walk {
    /// `None` once the underlying walk is exhausted or abandoned.
    entries: Option<EntryIter>,
    pending: VecDeque<WalkEvent>,
    /// Directories entered and not yet exited, innermost last.
    open: Vec<PathBuf>,
    cancel: Arc<AtomicBool>,
    cancelled: bool,
    follow_links: bool,
}

impl Walk {
    /// Whether the walk stopped early because cancellation was requested.
    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    fn close_to_depth(&mut self, depth: usize) {
        while self.open.len() > depth {
            if let Some(path) = self.open.pop() {
                self.pending.push_back(WalkEvent::ExitDir { path });
            }
        }
    }

    fn stop(&mut self) {
        self.entries = None;
        self.close_to_depth(0);
    }

    fn on_entry(&mut self, entry: Entry) {
        let depth = entry.depth;
        self.close_to_depth(depth);

        let path = entry.path();
        let file_type = entry.file_type();

        if depth > 0 && file_type.is_symlink() {
            debug!("not following symlink {}", path.display());
            self.pending
                .push_back(WalkEvent::Skipped(Diagnostic::symlink(&path)));
            return;
        }

        if depth == 0 || file_type.is_dir() {
            self.pending.push_back(WalkEvent::EnterDir {
                path: path.clone(),
                depth,
            });
            if let Some(err) = &entry.read_children_error {
                self.pending
                    .push_back(WalkEvent::Skipped(diagnostic_from(err, &path)));
            }
            self.open.push(path);
            return;
        }

        let meta = if self.follow_links {
            fs::metadata(&path)
        } else {
            fs::symlink_metadata(&path)
        };
        let event = match meta {
            Ok(meta) => WalkEvent::File(FileRecord::from_metadata(path, &meta)),
            Err(err) => {
                warn!("cannot stat {}: {err}", path.display());
                WalkEvent::Skipped(Diagnostic::from_io(&path, &err))
            }
        };
        self.pending.push_back(event);
    }
}

impl Iterator for Walk {
    type Item = WalkEvent;

    fn next(&mut self) -> Option<WalkEvent> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let entries = self.entries.as_mut()?;

            if self.cancel.load(Ordering::Relaxed) {
                debug!("walk cancelled with {} directories open", self.open.len());
                self.cancelled = true;
                self.stop();
                continue;
            }

            match entries.next() {
                Some(Ok(entry)) => self.on_entry(entry),
                Some(Err(err)) => {
                    let fallback = self.open.last().cloned().unwrap_or_default();
                    let diag = diagnostic_from(&err, &fallback);
                    warn!("skipping {}: {}", diag.path.display(), diag.message);
                    self.pending.push_back(WalkEvent::Skipped(diag));
                }
                None => self.stop(),
            }
        }
    }
}

/// Classify a `jwalk` error. Link cycles are reported as skipped symlinks.
fn diagnostic_from(err: &jwalk::Error, fallback: &Path) -> Diagnostic {
    let path = err.path().unwrap_or(fallback);
    if err.loop_ancestor().is_some() {
        return Diagnostic::new(DiagnosticKind::SymlinkSkipped, path, err.to_string());
    }
    match err.io_error() {
        Some(io_err) => Diagnostic::from_io(path, io_err),
        None => Diagnostic::new(DiagnosticKind::Io, path, err.to_string()),
    }
}
