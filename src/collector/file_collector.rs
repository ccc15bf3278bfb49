use crate::collector::record::Record;
use crate::collector::report::{CollectionReport, ConfigSnapshot, ReadFailure};
use crate::config::ScanConfiguration;
use crate::error::{CodeDumpError, Result};
use crate::scanner::{ContentClassifier, SourceFile, SourceScanner};
use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct CollectionProgress {
    pub files_written: usize,
    pub bytes_written: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    pub failures: Vec<ReadFailure>,
}

impl CollectionProgress {
    pub fn new() -> Self {
        Self {
            files_written: 0,
            bytes_written: 0,
            current_file: None,
            start_time: Instant::now(),
            failures: Vec::new(),
        }
    }

    pub fn record_file(&mut self, file: &SourceFile, bytes: u64) {
        self.files_written += 1;
        self.bytes_written += bytes;
        self.current_file = Some(file.relative_path.display().to_string());
    }

    pub fn record_failure(&mut self, file: &SourceFile, message: String, bytes: u64) {
        self.bytes_written += bytes;
        self.current_file = Some(file.relative_path.display().to_string());
        self.failures.push(ReadFailure {
            path: file.display_path(),
            message,
        });
    }

    /// Records of either kind written so far.
    pub fn records(&self) -> usize {
        self.files_written + self.failures.len()
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for CollectionProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Streams every selected file into the output artifact.
pub struct Collector {
    config: ScanConfiguration,
    scanner: SourceScanner,
}

impl Collector {
    pub fn new(config: ScanConfiguration) -> Result<Self> {
        let scanner = SourceScanner::new(&config)?;
        Ok(Self { config, scanner })
    }

    pub fn with_classifier<C: ContentClassifier + 'static>(mut self, classifier: C) -> Self {
        self.scanner = self.scanner.with_classifier(classifier);
        self
    }

    pub fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// Run one collection pass.
    ///
    /// The root is validated before the output file is created, so a bad
    /// root leaves no output behind. Per-file read failures become error
    /// records and never abort the run; failing to write the output does.
    pub fn collect(
        &self,
        progress_callback: Option<&dyn Fn(&CollectionProgress)>,
    ) -> Result<CollectionReport> {
        let output_path = self.config.output();
        self.scanner.check_root()?;

        let output_file = fs::File::create(output_path)
            .map_err(|e| CodeDumpError::output_not_writable(output_path, e))?;
        let mut writer = BufWriter::new(output_file);
        let mut walk = self.scanner.walk()?;

        tracing::info!(
            root = %self.config.root().display(),
            output = %output_path.display(),
            "starting collection"
        );

        let mut progress = CollectionProgress::new();
        let mut files_by_extension: BTreeMap<String, usize> = BTreeMap::new();

        for file in walk.by_ref() {
            match fs::read_to_string(&file.path) {
                Ok(content) => {
                    let record = Record::File {
                        path: &file.path,
                        content: &content,
                    };
                    let bytes = write_record(&mut writer, &record, output_path)?;
                    progress.record_file(&file, bytes);

                    let ext = if file.extension.is_empty() {
                        "no_extension".to_string()
                    } else {
                        file.extension.clone()
                    };
                    *files_by_extension.entry(ext).or_insert(0) += 1;
                }
                Err(e) => {
                    tracing::warn!(path = %file.path.display(), error = %e, "failed to read file");
                    let record = Record::ReadError {
                        path: &file.path,
                        message: e.to_string(),
                    };
                    let bytes = write_record(&mut writer, &record, output_path)?;
                    progress.record_failure(&file, e.to_string(), bytes);
                }
            }

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        writer
            .flush()
            .map_err(|e| CodeDumpError::output_not_writable(output_path, e))?;

        let statistics = walk.statistics().clone();
        tracing::info!(
            files = progress.files_written,
            errors = progress.failures.len(),
            skipped = statistics.skipped(),
            "collection finished"
        );

        Ok(CollectionReport::new(
            &self.config,
            &progress,
            files_by_extension,
            statistics,
            ConfigSnapshot::from(&self.config),
        ))
    }

    /// List what a run would collect without reading or writing anything.
    pub fn plan(&self) -> Result<Vec<SourceFile>> {
        let (files, statistics) = self.scanner.scan()?;
        tracing::debug!("{}", statistics.display_summary());
        Ok(files)
    }
}

// Each record is flushed as soon as it is complete so an interrupted run
// leaves a valid prefix of whole records.
fn write_record<W: Write>(writer: &mut W, record: &Record<'_>, output: &Path) -> Result<u64> {
    let bytes = record
        .write_to(writer)
        .and_then(|bytes| writer.flush().map(|_| bytes))
        .map_err(|e| CodeDumpError::output_not_writable(output, e))?;
    Ok(bytes)
}

/// Collect `root` into `output` with the library defaults for any list left as `None`.
pub fn collect<R, O>(
    root: R,
    output: O,
    extensions: Option<&[&str]>,
    excluded_dirs: Option<&[&str]>,
    excluded_file_patterns: Option<&[&str]>,
) -> Result<CollectionReport>
where
    R: Into<PathBuf>,
    O: Into<PathBuf>,
{
    let mut config = ScanConfiguration::new(root, output);
    if let Some(extensions) = extensions {
        config = config.with_extensions(extensions.iter().copied());
    }
    if let Some(dirs) = excluded_dirs {
        config = config.with_exclude_dirs(dirs.iter().copied());
    }
    if let Some(patterns) = excluded_file_patterns {
        config = config.with_exclude_files(patterns.iter().copied());
    }

    Collector::new(config)?.collect(None)
}
