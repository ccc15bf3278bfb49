use crate::collector::file_collector::CollectionProgress;
use crate::config::ScanConfiguration;
use crate::scanner::ScanStatistics;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadFailure {
    pub path: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
}

impl From<&ScanConfiguration> for ConfigSnapshot {
    fn from(config: &ScanConfiguration) -> Self {
        Self {
            extensions: config.extensions().to_vec(),
            exclude_dirs: config.exclude_dirs().to_vec(),
            exclude_files: config.exclude_files().to_vec(),
        }
    }
}

/// Summary of one run. Purely informational; nothing here is written to the dump.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionReport {
    pub root: String,
    pub output_path: String,
    pub files_written: usize,
    pub bytes_written: u64,
    pub read_errors: Vec<ReadFailure>,
    pub files_by_extension: BTreeMap<String, usize>,
    pub scan: ScanStatistics,
    pub duration_ms: u64,
    pub generated_at: DateTime<Utc>,
    pub config_used: ConfigSnapshot,
}

impl CollectionReport {
    pub fn new(
        config: &ScanConfiguration,
        progress: &CollectionProgress,
        files_by_extension: BTreeMap<String, usize>,
        scan: ScanStatistics,
        config_used: ConfigSnapshot,
    ) -> Self {
        Self {
            root: config.root().display().to_string(),
            output_path: config.output().display().to_string(),
            files_written: progress.files_written,
            bytes_written: progress.bytes_written,
            read_errors: progress.failures.clone(),
            files_by_extension,
            scan,
            duration_ms: progress.elapsed().as_millis() as u64,
            generated_at: Utc::now(),
            config_used,
        }
    }

    pub fn has_read_errors(&self) -> bool {
        !self.read_errors.is_empty()
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Collection Results:\n  Root: {}\n  Output: {}\n  Files written: {}\n  Bytes written: {}\n",
            self.root, self.output_path, self.files_written, self.bytes_written
        );

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        let skipped = self.scan.skipped();
        if skipped > 0 {
            summary.push_str(&format!("  Skipped: {}\n", skipped));
        }

        if self.has_read_errors() {
            summary.push_str(&format!("  Read errors: {}\n", self.read_errors.len()));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> CollectionReport {
        let config = ScanConfiguration::new("/repo", "/repo/all_code.txt");
        let mut progress = CollectionProgress::new();
        progress.files_written = 3;
        progress.bytes_written = 120;
        progress.failures.push(ReadFailure {
            path: "/repo/x.py".to_string(),
            message: "denied".to_string(),
        });

        let mut by_ext = BTreeMap::new();
        by_ext.insert("rs".to_string(), 2);
        by_ext.insert("py".to_string(), 1);

        let scan = ScanStatistics {
            files_seen: 6,
            selected: 4,
            unmatched_extension: 2,
            ..Default::default()
        };

        CollectionReport::new(&config, &progress, by_ext, scan, ConfigSnapshot::from(&config))
    }

    #[test]
    fn test_report_summary() {
        let report = sample_report();
        let summary = report.display_summary();

        assert!(summary.contains("Files written: 3"));
        assert!(summary.contains("rs: 2 files"));
        assert!(summary.contains("Skipped: 2"));
        assert!(summary.contains("Read errors: 1"));
        assert!(report.has_read_errors());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = sample_report();
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["files_written"], 3);
        assert_eq!(json["output_path"], "/repo/all_code.txt");
        assert_eq!(json["read_errors"][0]["message"], "denied");
        assert_eq!(json["config_used"]["extensions"].as_array().unwrap().len(), 15);
    }
}
