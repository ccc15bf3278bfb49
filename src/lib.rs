pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, FilterConfig, OutputConfig, ScanConfiguration};
pub use error::{CodeDumpError, Result, UserFriendlyError};

// Core functionality re-exports
pub use collector::{collect, CollectionProgress, CollectionReport, Collector, Record};
pub use scanner::{ContentClassifier, FileFilter, MimeClassifier, SourceFile, SourceScanner};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for CodeDump functionality
pub struct CodeDump {
    collector: Collector,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl CodeDump {
    pub fn new(scan: ScanConfiguration, output_mode: OutputMode, verbose: u8, quiet: bool) -> Result<Self> {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Ok(Self {
            collector: Collector::new(scan)?,
            output_formatter,
            progress_manager,
        })
    }

    /// Build from CLI arguments. The running executable is always excluded.
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let root = cli_args.resolve_root()?;

        let mut scan = config.to_scan_configuration(&root);
        if let Ok(exe) = std::env::current_exe() {
            scan = scan.with_always_excluded(exe);
        }

        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Self::new(scan, output_mode, cli_args.verbose, cli_args.quiet)
    }

    /// Run the collection pass with progress indication.
    pub fn run(&self) -> Result<CollectionReport> {
        let scan = self.collector.config();
        self.output_formatter.start_operation(&format!(
            "Collecting sources from {}",
            scan.root().display()
        ));

        let pb = self.progress_manager.create_collect_progress();
        let progress_callback = {
            let pb = pb.clone();
            move |progress: &CollectionProgress| {
                ui::progress::update_collect_progress(&pb, progress);
            }
        };

        let result = self.collector.collect(Some(&progress_callback));

        match result {
            Ok(report) => {
                ui::progress::finish_progress_with_summary(
                    &pb,
                    &format!("Collected {} files", report.files_written),
                    pb.elapsed(),
                );
                Ok(report)
            }
            Err(e) => {
                pb.finish_and_clear();
                Err(e)
            }
        }
    }

    /// Files a run would collect, in order, without touching the output file.
    pub fn dry_run(&self) -> Result<Vec<SourceFile>> {
        let pb = self.progress_manager.create_spinner("Scanning");
        let files = self.collector.plan();
        pb.finish_and_clear();
        files
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config()?;
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    pub fn scan_configuration(&self) -> &ScanConfiguration {
        self.collector.config()
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &CodeDumpError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
