use crate::config::ScanConfiguration;
use crate::error::{CodeDumpError, Result};
use crate::scanner::classifier::{ContentClassifier, MimeClassifier};
use crate::scanner::file_filter::FileFilter;
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file selected for collection.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Walk path: the root as given joined with the relative path.
    pub path: PathBuf,
    pub relative_path: PathBuf,
    pub canonical_path: PathBuf,
    pub file_name: String,
    pub extension: String,
}

impl SourceFile {
    fn new(path: PathBuf, relative_path: PathBuf, canonical_path: PathBuf) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        Self {
            path,
            relative_path,
            canonical_path,
            file_name,
            extension,
        }
    }

    pub fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

/// Counters for everything the walk looked at and why it was passed over.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanStatistics {
    pub files_seen: usize,
    pub selected: usize,
    pub excluded_by_pattern: usize,
    pub always_excluded: usize,
    pub duplicates: usize,
    pub unmatched_extension: usize,
    pub non_text: usize,
    pub special_files: usize,
    pub walk_errors: usize,
}

impl ScanStatistics {
    pub fn skipped(&self) -> usize {
        self.excluded_by_pattern
            + self.always_excluded
            + self.duplicates
            + self.unmatched_extension
            + self.non_text
            + self.special_files
    }

    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Scan Results:\n  Files seen: {}\n  Selected: {}\n",
            self.files_seen, self.selected
        );

        let reasons = [
            ("excluded by pattern", self.excluded_by_pattern),
            ("always excluded", self.always_excluded),
            ("duplicate paths", self.duplicates),
            ("extension not included", self.unmatched_extension),
            ("not text", self.non_text),
            ("special files", self.special_files),
            ("unreadable directories", self.walk_errors),
        ];

        for (reason, count) in reasons.iter().filter(|(_, count)| *count > 0) {
            summary.push_str(&format!("  Skipped ({}): {}\n", reason, count));
        }

        summary
    }
}

pub struct SourceScanner {
    filter: FileFilter,
    classifier: Box<dyn ContentClassifier>,
    root: PathBuf,
    always_excluded: Vec<PathBuf>,
}

impl SourceScanner {
    pub fn new(config: &ScanConfiguration) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::new(config)?,
            classifier: Box::new(MimeClassifier::new()),
            root: config.root().to_path_buf(),
            always_excluded: config.always_excluded().map(Path::to_path_buf).collect(),
        })
    }

    pub fn with_classifier<C: ContentClassifier + 'static>(mut self, classifier: C) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Fails unless the root is an existing, listable directory.
    pub fn check_root(&self) -> Result<()> {
        validate_root(&self.root)
    }

    /// Start a lazy walk of the root. Fails if the root is not a readable directory.
    ///
    /// Always-excluded paths are resolved here, so a walk started after the
    /// output file was created compares against its fully resolved path.
    pub fn walk(&self) -> Result<SourceWalk<'_>> {
        validate_root(&self.root)?;

        let mut excluded = HashSet::new();
        for path in &self.always_excluded {
            excluded.extend(excluded_forms(path));
        }

        let filter = &self.filter;
        let entries = WalkDir::new(&self.root)
            .follow_links(false)
            // Stable sort: a directory's files come before its subdirectories,
            // otherwise the filesystem's listing order is kept.
            .sort_by(|a, b| a.file_type().is_dir().cmp(&b.file_type().is_dir()))
            .into_iter()
            .filter_entry(move |e| should_traverse(filter, e));

        Ok(SourceWalk {
            entries: Box::new(entries),
            scanner: self,
            excluded,
            processed: HashSet::new(),
            stats: ScanStatistics::default(),
        })
    }

    /// Collect the full selection without reading any content.
    pub fn scan(&self) -> Result<(Vec<SourceFile>, ScanStatistics)> {
        let mut walk = self.walk()?;
        let files: Vec<SourceFile> = walk.by_ref().collect();
        Ok((files, walk.statistics().clone()))
    }
}

fn validate_root(root: &Path) -> Result<()> {
    let metadata = fs::metadata(root).map_err(|e| CodeDumpError::invalid_root(root, &e.to_string()))?;
    if !metadata.is_dir() {
        return Err(CodeDumpError::invalid_root(root, "not a directory"));
    }
    fs::read_dir(root).map_err(|e| CodeDumpError::invalid_root(root, &e.to_string()))?;
    Ok(())
}

// Every spelling an always-excluded path can be matched by: the absolute
// path, and the canonical path. A file that does not exist yet is resolved
// through its canonical parent directory.
fn excluded_forms(path: &Path) -> Vec<PathBuf> {
    let mut forms = Vec::with_capacity(2);
    if let Ok(absolute) = std::path::absolute(path) {
        forms.push(absolute);
    }

    let canonical = fs::canonicalize(path).ok().or_else(|| {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let name = path.file_name()?;
        fs::canonicalize(parent).ok().map(|dir| dir.join(name))
    });
    forms.extend(canonical);
    forms
}

fn should_traverse(filter: &FileFilter, entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return true;
    }

    let name = entry.file_name().to_string_lossy();
    let descend = filter.should_descend(&name);
    if !descend {
        tracing::debug!(dir = %entry.path().display(), "pruned excluded directory");
    }
    descend
}

/// Iterator over the selected files, in walk order.
pub struct SourceWalk<'a> {
    entries: Box<dyn Iterator<Item = walkdir::Result<DirEntry>> + 'a>,
    scanner: &'a SourceScanner,
    excluded: HashSet<PathBuf>,
    processed: HashSet<PathBuf>,
    stats: ScanStatistics,
}

impl<'a> SourceWalk<'a> {
    pub fn statistics(&self) -> &ScanStatistics {
        &self.stats
    }

    fn select(&mut self, entry: DirEntry) -> Option<SourceFile> {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            return None;
        }

        if file_type.is_symlink() {
            // Links to directories are neither descended nor collected.
            // Dangling links fall through and surface as read errors.
            if fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()) {
                return None;
            }
        } else if !file_type.is_file() {
            self.stats.special_files += 1;
            tracing::trace!(path = %entry.path().display(), "skipping special file");
            return None;
        }

        self.stats.files_seen += 1;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy();

        if self.scanner.filter.is_excluded_file(&name) {
            self.stats.excluded_by_pattern += 1;
            tracing::trace!(path = %path.display(), "excluded by file pattern");
            return None;
        }

        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let canonical = fs::canonicalize(path).unwrap_or_else(|_| absolute.clone());

        if self.excluded.contains(&absolute) || self.excluded.contains(&canonical) {
            self.stats.always_excluded += 1;
            tracing::debug!(path = %path.display(), "skipping always-excluded path");
            return None;
        }

        // Marked before the extension check: a later alias of the same
        // physical file is skipped even if this name was not selected.
        if !self.processed.insert(canonical.clone()) {
            self.stats.duplicates += 1;
            tracing::debug!(path = %path.display(), "already processed via another path");
            return None;
        }

        if !self.scanner.filter.has_included_extension(&name) {
            self.stats.unmatched_extension += 1;
            return None;
        }

        if !self.scanner.classifier.is_text(&name) {
            self.stats.non_text += 1;
            tracing::debug!(path = %path.display(), "classified as non-text");
            return None;
        }

        let relative_path = path
            .strip_prefix(&self.scanner.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(name.as_ref()));

        self.stats.selected += 1;
        Some(SourceFile::new(path.to_path_buf(), relative_path, canonical))
    }
}

impl<'a> Iterator for SourceWalk<'a> {
    type Item = SourceFile;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    self.stats.walk_errors += 1;
                    tracing::warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };

            if let Some(file) = self.select(entry) {
                return Some(file);
            }
        }
    }
}
