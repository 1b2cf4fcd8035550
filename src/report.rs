//! Plain-text rendering of a scan report.

use folderlens_core::analysis::summary::{
    category_percentages, dominant_category_of, folder_comparison, EXTENSION_DISTRIBUTION_LIMIT,
    FOLDER_COMPARISON_LIMIT,
};
use folderlens_core::export::{format_timestamp, ReportExtras};
use folderlens_core::model::size::{format_count, format_size};
use folderlens_core::ScanReport;
use std::io::{self, Write};

pub fn write_text<W: Write>(report: &ScanReport, extras: &ReportExtras, mut out: W) -> io::Result<()> {
    let overview = report.overview();
    let aggregates = &report.aggregates;

    writeln!(out, "FolderLens report for {}", report.root.display())?;
    writeln!(
        out,
        "{} files in {} folders, {} total (scanned in {:.2?})",
        format_count(overview.total_files),
        format_count(overview.total_folders),
        overview.size_display(),
        overview.duration
    )?;

    section(&mut out, "Categories")?;
    for (category, pct) in category_percentages(&aggregates.categories) {
        let total = aggregates.categories.get(category);
        writeln!(
            out,
            "  {:<12} {:>12} {:>6.1}%  {:>10} files",
            category.label(),
            format_size(total.byte_count),
            pct,
            format_count(total.file_count)
        )?;
    }

    section(&mut out, "Largest files")?;
    for file in &aggregates.largest_files {
        writeln!(out, "  {:>12}  {}", format_size(file.size), file.path.display())?;
    }

    section(&mut out, "Size distribution")?;
    for bucket in aggregates.size_histogram.buckets() {
        writeln!(
            out,
            "  {:<24} {:>10} files {:>12}",
            bucket.label(),
            format_count(bucket.file_count),
            format_size(bucket.byte_count)
        )?;
    }

    section(&mut out, "Extensions")?;
    for (ext, stats) in aggregates.extensions.most_common(EXTENSION_DISTRIBUTION_LIMIT) {
        writeln!(
            out,
            "  {:<16} {:>10} files {:>12}",
            ext,
            format_count(stats.file_count),
            format_size(stats.byte_count)
        )?;
    }

    let folders = folder_comparison(&report.tree, FOLDER_COMPARISON_LIMIT);
    if !folders.is_empty() {
        section(&mut out, "Folders")?;
        for folder in folders {
            let dominant = dominant_category_of(&report.tree, folder.index)
                .map(|c| c.label())
                .unwrap_or("-");
            writeln!(
                out,
                "  {:>12}  {:<32} {}",
                format_size(folder.total_size),
                folder.name,
                dominant
            )?;
        }
    }

    section(&mut out, "Insights")?;
    if report.insights.is_empty() {
        writeln!(out, "  No notable findings.")?;
    }
    for insight in &report.insights {
        writeln!(out, "  [{}] {}", insight.severity.label(), insight.message)?;
    }

    if !report.diagnostics.is_empty() {
        section(&mut out, "Skipped entries")?;
        for diag in &report.diagnostics {
            writeln!(out, "  {}: {} ({})", diag.kind.label(), diag.path.display(), diag.message)?;
        }
    }

    if let Some(hits) = &extras.search {
        section(&mut out, "Search results")?;
        for hit in hits {
            let kind = if hit.is_folder { "dir " } else { "file" };
            writeln!(
                out,
                "  {kind} {:>12}  {:.2}  {}",
                hit.size_display(),
                hit.score,
                hit.path.display()
            )?;
        }
    }

    if let Some(groups) = &extras.duplicates {
        section(&mut out, "Possible duplicates")?;
        for group in groups {
            writeln!(
                out,
                "  {} x {} ({} each, {} reclaimable)",
                group.files.len(),
                group.name,
                format_size(group.size),
                format_size(group.wasted_bytes())
            )?;
            for file in &group.files {
                writeln!(out, "      {}", file.path.display())?;
            }
        }
    }

    if let Some(stale) = &extras.stale_files {
        section(&mut out, "Stale files")?;
        for entry in stale {
            let modified = entry.file.modified.map(format_timestamp).unwrap_or_default();
            writeln!(
                out,
                "  {:>12}  {:>5} days  {}  {}",
                format_size(entry.file.size),
                entry.age_days,
                modified,
                entry.file.path.display()
            )?;
        }
    }

    Ok(())
}

fn section<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use folderlens_core::{scan_folder, ScanConfig, ScanOutcome};
    use std::fs;

    #[test]
    fn text_report_lists_sections() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.rs"), vec![b'x'; 900]).unwrap();
        fs::write(dir.path().join("data.json"), vec![b'{'; 100]).unwrap();

        let ScanOutcome::Completed(report) = scan_folder(dir.path(), &ScanConfig::default()) else {
            panic!("scan did not complete");
        };
        let mut out = Vec::new();
        write_text(&report, &ReportExtras::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("2 files in 1 folders"));
        assert!(text.contains("Code"));
        assert!(text.contains("Dominant category: Code"));
        assert!(text.contains("main.rs"));
        assert!(!text.contains("Search results"));
    }
}
