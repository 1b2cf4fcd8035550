//! FolderLens: folder storage analyser.
//!
//! Thin binary entry point. All scanning and analysis lives in the
//! `folderlens-core` crate; this file wires it to the command line.

mod cli;
mod report;

use anyhow::{bail, Context};
use clap::Parser;
use folderlens_core::analysis::{find_duplicates, find_stale_files, search, SearchQuery};
use folderlens_core::export::{self, ReportExtras};
use folderlens_core::model::size::{format_count, format_size};
use folderlens_core::scanner::progress::ScanProgress;
use folderlens_core::{start_scan, ScanOutcome, ScanReport};
use std::io::{self, Write};
use std::time::SystemTime;

/// Stale files listed at most.
const STALE_FILE_LIMIT: usize = 50;

fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    // Initialise structured logging. stdout is reserved for the report.
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(io::stderr)
        .init();

    let config = args.scan_config().context("invalid configuration")?;
    let handle = start_scan(args.path.clone(), config).context("failed to start scan")?;

    let mut outcome = None;
    for message in handle.progress_rx.iter() {
        match message {
            ScanProgress::Update {
                files_scanned,
                bytes_scanned,
                dirs_scanned,
                ..
            } => {
                if !args.quiet {
                    eprint!(
                        "\rScanning: {} files, {} folders, {}   ",
                        format_count(files_scanned),
                        format_count(dirs_scanned),
                        format_size(bytes_scanned)
                    );
                }
            }
            terminal => outcome = ScanOutcome::from_progress(terminal),
        }
    }
    if !args.quiet {
        eprintln!();
    }

    let report = match outcome {
        Some(ScanOutcome::Completed(report)) => report,
        Some(ScanOutcome::Failed(err)) => {
            return Err(err).with_context(|| format!("cannot scan {}", args.path.display()))
        }
        Some(ScanOutcome::Cancelled) => bail!("scan cancelled"),
        None => bail!("scanner stopped without a result"),
    };

    let extras = collect_extras(&args, &report);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match args.format {
        cli::OutputFormat::Text => report::write_text(&report, &extras, &mut out)?,
        cli::OutputFormat::Json => {
            export::write_json(&report, &extras, &mut out)?;
            writeln!(out)?;
        }
        cli::OutputFormat::Csv => {
            export::write_categories_csv(&report.aggregates.categories, &mut out)?;
            writeln!(out)?;
            export::write_files_csv(&report.aggregates.largest_files, &mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Run the optional tools requested on the command line.
fn collect_extras(args: &cli::Args, report: &ScanReport) -> ReportExtras {
    ReportExtras {
        search: args
            .search
            .as_ref()
            .map(|query| search(&report.tree, &SearchQuery::new(query.as_str()))),
        duplicates: args.duplicates.then(|| find_duplicates(&report.tree)),
        stale_files: args.stale_days.map(|days| {
            find_stale_files(&report.tree, days, STALE_FILE_LIMIT, SystemTime::now())
        }),
    }
}
