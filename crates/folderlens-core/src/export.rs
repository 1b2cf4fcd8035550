/// Report export: a JSON summary of a scan and CSV tables of its largest
/// files and category totals.
use crate::analysis::age::StaleFile;
use crate::analysis::aggregator::CategoryTotals;
use crate::analysis::duplicates::DuplicateGroup;
use crate::analysis::histogram::{ExtensionStats, SizeBucket};
use crate::analysis::insights::Insight;
use crate::analysis::search::SearchHit;
use crate::analysis::summary::{
    folder_comparison, FolderSize, Overview, EXTENSION_DISTRIBUTION_LIMIT, FOLDER_COMPARISON_LIMIT,
};
use crate::error::{Diagnostic, ExportError};
use crate::model::size::format_size;
use crate::model::FileRecord;
use crate::scanner::ScanReport;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::io::Write;
use std::time::SystemTime;

/// One file as it appears in exported tables.
#[derive(Debug, Serialize)]
struct FileRow {
    path: String,
    size: u64,
    size_display: String,
    category: &'static str,
    modified: Option<String>,
}

impl From<&FileRecord> for FileRow {
    fn from(file: &FileRecord) -> Self {
        Self {
            path: file.path.to_string_lossy().into_owned(),
            size: file.size,
            size_display: format_size(file.size),
            category: file.category().label(),
            modified: file.modified.map(format_timestamp),
        }
    }
}

#[derive(Debug, Serialize)]
struct CategoryRow {
    category: &'static str,
    file_count: u64,
    byte_count: u64,
    size_display: String,
    percentage: f64,
}

fn category_rows(totals: &CategoryTotals) -> Vec<CategoryRow> {
    totals
        .by_size()
        .into_iter()
        .map(|(category, total)| CategoryRow {
            category: category.label(),
            file_count: total.file_count,
            byte_count: total.byte_count,
            size_display: format_size(total.byte_count),
            percentage: (totals.ratio(category) * 1000.0).round() / 10.0,
        })
        .collect()
}

/// Optional tool results appended to the JSON report.
#[derive(Debug, Default, Serialize)]
pub struct ReportExtras {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<Vec<SearchHit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<Vec<DuplicateGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stale_files: Option<Vec<StaleFile>>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    root: String,
    overview: Overview,
    categories: Vec<CategoryRow>,
    extensions: Vec<(String, ExtensionStats)>,
    size_histogram: &'a [SizeBucket],
    largest_files: Vec<FileRow>,
    folders: Vec<FolderSize>,
    insights: &'a [Insight],
    diagnostics: &'a [Diagnostic],
    #[serde(flatten)]
    extras: &'a ReportExtras,
}

/// RFC 3339 timestamp in UTC, whole seconds.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Write a pretty-printed JSON summary of `report`.
pub fn write_json<W: Write>(
    report: &ScanReport,
    extras: &ReportExtras,
    writer: W,
) -> Result<(), ExportError> {
    let aggregates = &report.aggregates;
    let view = JsonReport {
        root: report.root.to_string_lossy().into_owned(),
        overview: report.overview(),
        categories: category_rows(&aggregates.categories),
        extensions: aggregates.extensions.most_common(EXTENSION_DISTRIBUTION_LIMIT),
        size_histogram: aggregates.size_histogram.buckets(),
        largest_files: aggregates.largest_files.iter().map(FileRow::from).collect(),
        folders: folder_comparison(&report.tree, FOLDER_COMPARISON_LIMIT),
        insights: &report.insights,
        diagnostics: &report.diagnostics,
        extras,
    };
    serde_json::to_writer_pretty(writer, &view)?;
    Ok(())
}

/// Write `files` as CSV with a header row.
pub fn write_files_csv<W: Write>(files: &[FileRecord], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for file in files {
        csv.serialize(FileRow::from(file))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write non-empty category totals as CSV, largest first.
pub fn write_categories_csv<W: Write>(
    totals: &CategoryTotals,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in category_rows(totals) {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}
