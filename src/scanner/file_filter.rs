use crate::config::ScanConfiguration;
use crate::error::{CodeDumpError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Name-based selection rules: included extensions, pruned directories and
/// excluded file name globs.
pub struct FileFilter {
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_set: GlobSet,
}

impl FileFilter {
    pub fn new(config: &ScanConfiguration) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for pattern in config.exclude_files() {
            let glob = Glob::new(pattern).map_err(|e| CodeDumpError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
            builder.add(glob);
        }
        let exclude_set = builder.build()?;

        Ok(Self {
            extensions: config.extensions().iter().map(|e| e.to_lowercase()).collect(),
            exclude_dirs: config.exclude_dirs().to_vec(),
            exclude_set,
        })
    }

    /// Exact, case-sensitive match against the excluded directory names.
    pub fn should_descend(&self, dir_name: &str) -> bool {
        !self.exclude_dirs.iter().any(|d| d == dir_name)
    }

    /// Glob match against the bare file name.
    pub fn is_excluded_file(&self, file_name: &str) -> bool {
        self.exclude_set.is_match(file_name)
    }

    /// Case-insensitive suffix match, so `.RS` and `.rs` both select `main.Rs`.
    pub fn has_included_extension(&self, file_name: &str) -> bool {
        let name = file_name.to_lowercase();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}
