/// Error types for the scanning core.
///
/// Only failures that stop a scan outright are errors. Per-entry problems
/// encountered during the walk (permission denied, unreadable metadata,
/// skipped symlinks) are [`Diagnostic`]s collected alongside the result.
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A failure that aborts a scan before any result can be produced.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The root path does not exist.
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// The root path exists but is not a directory.
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The root directory exists but could not be read.
    #[error("cannot read {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background scanner thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] io::Error),

    /// The scanner thread exited without reporting a result.
    #[error("scanner thread panicked")]
    WorkerPanicked,
}

/// Errors raised while loading or validating a [`crate::config::ScanConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Errors raised while writing a report.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),
}

/// Classification of a recoverable, per-entry scan event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DiagnosticKind {
    /// A directory or file could not be read due to missing permissions.
    PermissionDenied,
    /// A symbolic link was not traversed (or a link cycle was detected).
    SymlinkSkipped,
    /// Any other I/O failure on a single entry.
    Io,
}

impl DiagnosticKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission denied",
            Self::SymlinkSkipped => "symlink skipped",
            Self::Io => "I/O error",
        }
    }
}

/// A recoverable event recorded during a walk. The walk always continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub path: PathBuf,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Build a diagnostic from an I/O error, mapping `PermissionDenied`
    /// to its own kind and everything else to [`DiagnosticKind::Io`].
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => DiagnosticKind::PermissionDenied,
            _ => DiagnosticKind::Io,
        };
        Self::new(kind, path, err.to_string())
    }

    pub fn symlink(path: &Path) -> Self {
        Self::new(
            DiagnosticKind::SymlinkSkipped,
            path,
            "symbolic link not followed",
        )
    }
}
