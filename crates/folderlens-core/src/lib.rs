/// Folder scanning and storage analysis for FolderLens.
///
/// Nothing here prints or renders. The `folderlens` binary is one
/// frontend; anything that can read a channel can drive a scan.
///
/// # Modules
///
/// - [`model`]: Arena-allocated directory tree, file records and size formatting.
/// - [`scanner`]: Background folder scanning with progress reporting and cancellation.
/// - [`analysis`]: Categorisation, streaming aggregation, insights, search and other tools.
/// - [`config`]: Scan options with defaults, JSON loading and validation.
/// - [`export`]: JSON and CSV report writers.
/// - [`error`]: Fatal errors and per-entry diagnostics.
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod scanner;

pub use config::ScanConfig;
pub use error::{Diagnostic, DiagnosticKind, ScanError};
pub use scanner::{run_scan, scan_folder, start_scan, ScanHandle, ScanOutcome, ScanReport, ScanSession};
