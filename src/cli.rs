use crate::config::{CliOverrides, Config};
use crate::error::{CodeDumpError, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "codedump")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Flatten a source tree into a single text file")]
#[command(
    long_about = "CodeDump walks a directory tree, keeps source files that match the configured \
                  extensions and exclusions, and concatenates them into one file with a \
                  'File: <path>' header before each file."
)]
#[command(after_help = "EXAMPLES:\n  \
    codedump\n  \
    codedump ~/src/project --output project.txt\n  \
    codedump . --extensions rs,toml --exclude-dirs target,.git\n  \
    codedump --dry-run -v")]
pub struct Cli {
    /// Directory to scan (defaults to the current directory)
    pub root: Option<PathBuf>,

    /// Output file (defaults to <ROOT>/all_code.txt)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// File extensions to include, replacing the defaults (comma-separated)
    #[arg(short, long, help = "Extensions to include (e.g. py,rs,.ts)")]
    pub extensions: Option<String>,

    /// Additional directory names to prune
    #[arg(short = 'x', long, value_delimiter = ',')]
    pub exclude_dirs: Option<Vec<String>>,

    /// Additional file name globs to skip
    #[arg(long, value_delimiter = ',')]
    pub exclude_files: Option<Vec<String>>,

    /// Configuration file path
    #[arg(short, long, env = "CODEDUMP_CONFIG", help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for status and the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// List the files that would be collected without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_extensions(self.extensions.clone())
            .with_exclude_dirs(self.exclude_dirs.clone())
            .with_exclude_files(self.exclude_files.clone())
            .with_output(self.output.clone())
    }

    /// The given root, or the current directory.
    pub fn resolve_root(&self) -> Result<PathBuf> {
        match self.root {
            Some(ref root) => Ok(root.clone()),
            None => std::env::current_dir().map_err(|e| CodeDumpError::Config {
                message: format!("Cannot determine current directory: {}", e),
            }),
        }
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Default tracing filter for this verbosity, used when RUST_LOG is unset.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity_level() {
            _ if self.quiet => "codedump=error",
            0 => "codedump=warn",
            1 => "codedump=info",
            2 => "codedump=debug",
            _ => "codedump=trace",
        }
    }
}
