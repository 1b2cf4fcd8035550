//! Command-line arguments and their mapping onto [`ScanConfig`].

use clap::{Parser, ValueEnum};
use folderlens_core::error::ConfigError;
use folderlens_core::model::size::parse_size;
use folderlens_core::ScanConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Folder storage analyser", long_about = None)]
pub struct Args {
    /// Folder to analyse
    pub path: PathBuf,

    /// JSON file with scan options; flags below override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Number of largest files to keep, overall and per category
    #[arg(long, value_name = "N")]
    pub top: Option<usize>,

    /// Files above this size are reported as large (e.g. 500MB, 1.5GiB)
    #[arg(long, value_name = "SIZE", value_parser = parse_size_arg)]
    pub large_file: Option<u64>,

    /// Share of bytes above which one category is reported as dominant
    #[arg(long, value_name = "RATIO")]
    pub dominant_ratio: Option<f64>,

    /// Traverse symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip dot-files and dot-directories
    #[arg(long)]
    pub skip_hidden: bool,

    /// Directory name to leave out of the scan (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Search file and folder names (`/regex`, glob with `*`/`?`, or plain text)
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,

    /// List likely duplicate files (same size and name)
    #[arg(long)]
    pub duplicates: bool,

    /// List files not modified in this many days
    #[arg(long, value_name = "DAYS")]
    pub stale_days: Option<u64>,

    /// Do not print progress to stderr
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

fn parse_size_arg(value: &str) -> Result<u64, String> {
    parse_size(value).ok_or_else(|| format!("invalid size '{value}'"))
}

impl Args {
    /// Defaults, then the config file, then flags.
    pub fn scan_config(&self) -> Result<ScanConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ScanConfig::from_json_file(path)?,
            None => ScanConfig::default(),
        };
        if let Some(top) = self.top {
            config.top_n_files = top;
        }
        if let Some(bytes) = self.large_file {
            config.large_file_threshold_bytes = bytes;
        }
        if let Some(ratio) = self.dominant_ratio {
            config.dominant_category_ratio = ratio;
        }
        config.follow_symlinks |= self.follow_symlinks;
        config.skip_hidden |= self.skip_hidden;
        config.exclude_names.extend(self.exclude.iter().cloned());
        config.validate()?;
        Ok(config)
    }
}
