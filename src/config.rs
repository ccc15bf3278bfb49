use crate::error::{CodeDumpError, Result};
use globset::Glob;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT_FILE: &str = "all_code.txt";

pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".html", ".css", ".scss", ".java", ".kt", ".cpp", ".c",
    ".cs", ".go", ".rs",
];

pub const DEFAULT_EXCLUDED_DIRS: &[&str] =
    &["node_modules", ".next", "dist", "build", "__pycache__", "venv"];

pub const DEFAULT_EXCLUDED_FILES: &[&str] = &[".env", ".env.*"];

// Extra names the command-line entry point skips on top of the library defaults.
const ENTRY_POINT_EXCLUDED_DIRS: &[&str] = &["orpheus_env"];
const ENTRY_POINT_EXCLUDED_FILES: &[&str] = &["next-env.d.ts", "next.config.ts"];

const DEFAULT_CONFIG_PATHS: &[&str] = &["codedump.toml", ".codedump.toml"];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Settings loaded from a configuration file. Anything a file leaves out
/// takes the command-line defaults, entry-point extras included.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default = "FilterConfig::entry_point")]
    pub filters: FilterConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default = "FilterConfig::entry_point")]
pub struct FilterConfig {
    pub extensions: Vec<String>,
    pub exclude_dirs: Vec<String>,
    pub exclude_files: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File name created inside the scanned root when no explicit path is given.
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            extensions: to_strings(DEFAULT_EXTENSIONS),
            exclude_dirs: to_strings(DEFAULT_EXCLUDED_DIRS),
            exclude_files: to_strings(DEFAULT_EXCLUDED_FILES),
        }
    }
}

impl FilterConfig {
    /// Library defaults plus the names the command-line tool also skips.
    pub fn entry_point() -> Self {
        let mut filters = Self::default();
        filters
            .exclude_dirs
            .extend(to_strings(ENTRY_POINT_EXCLUDED_DIRS));
        filters
            .exclude_files
            .extend(to_strings(ENTRY_POINT_EXCLUDED_FILES));
        filters
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: DEFAULT_OUTPUT_FILE.to_string(),
            path: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration used by the command-line tool when no file is found.
    pub fn entry_point() -> Self {
        Self {
            filters: FilterConfig::entry_point(),
            output: OutputConfig::default(),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(CodeDumpError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CodeDumpError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| CodeDumpError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                for default_path in DEFAULT_CONFIG_PATHS {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::entry_point())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref extensions) = cli_args.extensions {
            self.filters.extensions = parse_extension_list(extensions);
        }

        if let Some(ref exclude_dirs) = cli_args.exclude_dirs {
            for dir in exclude_dirs {
                if !self.filters.exclude_dirs.contains(dir) {
                    self.filters.exclude_dirs.push(dir.clone());
                }
            }
        }

        if let Some(ref exclude_files) = cli_args.exclude_files {
            for pattern in exclude_files {
                if !self.filters.exclude_files.contains(pattern) {
                    self.filters.exclude_files.push(pattern.clone());
                }
            }
        }

        if let Some(ref output) = cli_args.output {
            self.output.path = Some(output.clone());
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| CodeDumpError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| CodeDumpError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.filters.extensions.is_empty() {
            return Err(CodeDumpError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if self.filters.extensions.iter().any(|e| e.trim().is_empty()) {
            return Err(CodeDumpError::Config {
                message: "File extensions cannot be empty strings".to_string(),
            });
        }

        for pattern in &self.filters.exclude_files {
            Glob::new(pattern).map_err(|e| CodeDumpError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.kind().to_string(),
            })?;
        }

        let file_name = self.output.file_name.trim();
        if file_name.is_empty() || file_name.contains('/') || file_name.contains('\\') {
            return Err(CodeDumpError::Config {
                message: format!(
                    "Output file name must be a bare file name, got '{}'",
                    self.output.file_name
                ),
            });
        }

        Ok(())
    }

    /// Freeze this configuration into the immutable settings for one run over `root`.
    pub fn to_scan_configuration<P: AsRef<Path>>(&self, root: P) -> ScanConfiguration {
        let root = root.as_ref();
        let output = self
            .output
            .path
            .clone()
            .unwrap_or_else(|| root.join(&self.output.file_name));

        ScanConfiguration::new(root, output).with_filters(&self.filters)
    }

    pub fn create_sample_config() -> Result<String> {
        toml::to_string_pretty(&Self::entry_point()).map_err(|e| CodeDumpError::Config {
            message: format!("Failed to serialize sample config: {}", e),
        })
    }
}

/// Split a comma separated extension list, lowercasing and adding the leading dot.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| if s.starts_with('.') { s } else { format!(".{}", s) })
        .collect()
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub extensions: Option<String>,
    pub exclude_dirs: Option<Vec<String>>,
    pub exclude_files: Option<Vec<String>>,
    pub output: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions(mut self, extensions: Option<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_exclude_dirs(mut self, exclude_dirs: Option<Vec<String>>) -> Self {
        self.exclude_dirs = exclude_dirs;
        self
    }

    pub fn with_exclude_files(mut self, exclude_files: Option<Vec<String>>) -> Self {
        self.exclude_files = exclude_files;
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = output;
        self
    }
}

/// Settings for a single collection run. Built once, never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ScanConfiguration {
    root: PathBuf,
    output: PathBuf,
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_files: Vec<String>,
    always_excluded: Vec<PathBuf>,
}

impl ScanConfiguration {
    /// Library defaults for extensions and exclusions.
    pub fn new<R: Into<PathBuf>, O: Into<PathBuf>>(root: R, output: O) -> Self {
        let filters = FilterConfig::default();
        Self {
            root: root.into(),
            output: output.into(),
            extensions: filters.extensions,
            exclude_dirs: filters.exclude_dirs,
            exclude_files: filters.exclude_files,
            always_excluded: Vec::new(),
        }
    }

    pub fn with_filters(self, filters: &FilterConfig) -> Self {
        self.with_extensions(filters.extensions.clone())
            .with_exclude_dirs(filters.exclude_dirs.clone())
            .with_exclude_files(filters.exclude_files.clone())
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = dedup(extensions.into_iter().map(Into::into));
        self
    }

    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = dedup(dirs.into_iter().map(Into::into));
        self
    }

    pub fn with_exclude_files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_files = dedup(patterns.into_iter().map(Into::into));
        self
    }

    /// Add a path that is never collected, whatever the filters say.
    pub fn with_always_excluded<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.always_excluded.push(path.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    pub fn exclude_dirs(&self) -> &[String] {
        &self.exclude_dirs
    }

    pub fn exclude_files(&self) -> &[String] {
        &self.exclude_files
    }

    /// The output file followed by every extra always-excluded path.
    pub fn always_excluded(&self) -> impl Iterator<Item = &Path> {
        std::iter::once(self.output.as_path()).chain(self.always_excluded.iter().map(PathBuf::as_path))
    }
}

fn dedup<I: Iterator<Item = String>>(items: I) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
