/// Scan configuration.
///
/// All tunables live in an explicit [`ScanConfig`] passed into the scanner at
/// construction. The core holds no process-wide state. Every field has a
/// default so a partial JSON file is accepted.
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const KIB: u64 = 1024;
const MIB: u64 = KIB * 1024;
const GIB: u64 = MIB * 1024;

/// Files strictly larger than this raise a large-file warning.
pub const DEFAULT_LARGE_FILE_THRESHOLD: u64 = 100 * MIB;

/// Length of the largest-files lists (global and per category).
pub const DEFAULT_TOP_N_FILES: usize = 10;

/// A category holding strictly more than this share of all bytes is
/// reported as dominant.
pub const DEFAULT_DOMINANT_CATEGORY_RATIO: f64 = 0.8;

/// Minimum interval between two progress updates.
pub const DEFAULT_PROGRESS_THROTTLE_MS: u64 = 100;

/// Maximum number of records processed between two progress updates.
pub const DEFAULT_PROGRESS_THROTTLE_RECORDS: u64 = 1_000;

/// A category with more files than this may trigger the many-small-files insight.
pub const DEFAULT_MANY_SMALL_FILES_COUNT: u64 = 1_000;

/// Average file size below which a crowded category counts as "small files".
pub const DEFAULT_SMALL_FILE_AVERAGE_BYTES: u64 = 100 * KIB;

/// Upper edges of the size-distribution buckets.
pub const DEFAULT_SIZE_BUCKETS: [u64; 5] = [KIB, MIB, 10 * MIB, 100 * MIB, GIB];

/// Options recognised by the scanner, aggregator and insight generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub large_file_threshold_bytes: u64,
    pub top_n_files: usize,
    pub dominant_category_ratio: f64,
    pub progress_throttle_ms: u64,
    pub progress_throttle_records: u64,
    pub follow_symlinks: bool,
    /// Skip dot-files and dot-directories.
    pub skip_hidden: bool,
    /// Directory names that are never descended into (e.g. `node_modules`).
    pub exclude_names: Vec<String>,
    pub size_buckets: Vec<u64>,
    pub many_small_files_count: u64,
    pub small_file_average_bytes: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            large_file_threshold_bytes: DEFAULT_LARGE_FILE_THRESHOLD,
            top_n_files: DEFAULT_TOP_N_FILES,
            dominant_category_ratio: DEFAULT_DOMINANT_CATEGORY_RATIO,
            progress_throttle_ms: DEFAULT_PROGRESS_THROTTLE_MS,
            progress_throttle_records: DEFAULT_PROGRESS_THROTTLE_RECORDS,
            follow_symlinks: false,
            skip_hidden: false,
            exclude_names: Vec::new(),
            size_buckets: DEFAULT_SIZE_BUCKETS.to_vec(),
            many_small_files_count: DEFAULT_MANY_SMALL_FILES_COUNT,
            small_file_average_bytes: DEFAULT_SMALL_FILE_AVERAGE_BYTES,
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the aggregator and insight rules cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.dominant_category_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "dominant_category_ratio must be in (0, 1], got {ratio}"
            )));
        }
        if self.size_buckets.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::Invalid(
                "size_buckets must be strictly increasing".into(),
            ));
        }
        Ok(())
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_throttle_ms)
    }

    /// The subset of options the insight rules read.
    pub fn insight_config(&self) -> InsightConfig {
        InsightConfig {
            large_file_threshold_bytes: self.large_file_threshold_bytes,
            dominant_category_ratio: self.dominant_category_ratio,
            many_small_files_count: self.many_small_files_count,
            small_file_average_bytes: self.small_file_average_bytes,
        }
    }
}

/// Thresholds for the insight rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightConfig {
    pub large_file_threshold_bytes: u64,
    pub dominant_category_ratio: f64,
    pub many_small_files_count: u64,
    pub small_file_average_bytes: u64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        ScanConfig::default().insight_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = ScanConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_n_files, 10);
        assert_eq!(config.large_file_threshold_bytes, 104_857_600);
        assert!(!config.follow_symlinks);
    }

    #[test]
    fn ratio_out_of_range_is_rejected() {
        for ratio in [0.0, -0.5, 1.5, f64::NAN] {
            let config = ScanConfig {
                dominant_category_ratio: ratio,
                ..ScanConfig::default()
            };
            assert!(config.validate().is_err(), "ratio {ratio} should be rejected");
        }
    }

    #[test]
    fn unsorted_buckets_are_rejected() {
        let config = ScanConfig {
            size_buckets: vec![10, 10, 20],
            ..ScanConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn partial_json_file_fills_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"top_n_files": 3, "follow_symlinks": true}}"#).unwrap();

        let config = ScanConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.top_n_files, 3);
        assert!(config.follow_symlinks);
        assert_eq!(config.progress_throttle_ms, DEFAULT_PROGRESS_THROTTLE_MS);
    }

    #[test]
    fn malformed_json_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        assert!(matches!(
            ScanConfig::from_json_file(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = ScanConfig::from_json_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
