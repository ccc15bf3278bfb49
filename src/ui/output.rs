use crate::collector::CollectionReport;
use crate::error::{CodeDumpError, UserFriendlyError};
use crate::scanner::SourceFile;
use console::{style, Term};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Error,
    Suggestion,
    Warning,
    Start,
    Info,
    Debug,
}

impl Level {
    /// Verbosity a message needs before it is shown. `None` means always shown.
    fn min_verbosity(self) -> Option<u8> {
        match self {
            Level::Error | Level::Suggestion => None,
            Level::Warning => Some(0),
            Level::Start | Level::Info => Some(1),
            Level::Debug => Some(2),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Suggestion => "suggestion",
            Level::Warning => "warning",
            Level::Start => "start",
            Level::Info => "info",
            Level::Debug => "debug",
        }
    }

    fn marker(self) -> &'static str {
        match self {
            Level::Error => "✗",
            Level::Suggestion => "→",
            Level::Warning => "!",
            Level::Start => ">",
            Level::Info => "i",
            Level::Debug => " ",
        }
    }

    fn goes_to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Suggestion)
    }
}

/// Status lines and the final report, rendered for the selected output mode.
///
/// The dump itself never passes through here.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors =
            mode == OutputMode::Human && !quiet && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose },
            quiet,
        }
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    pub fn start_operation(&self, operation: &str) {
        self.emit(Level::Start, operation);
    }

    pub fn print_user_friendly_error(&self, error: &CodeDumpError) {
        self.error(&error.user_message());
        if let Some(suggestion) = error.suggestion() {
            self.emit(Level::Suggestion, &suggestion);
        }
    }

    /// Final report. Human and plain modes always end with the output path line.
    pub fn print_collection_report(&self, report: &CollectionReport) {
        if self.mode == OutputMode::Json {
            match serde_json::to_string_pretty(report) {
                Ok(json) => println!("{}", json),
                Err(e) => self.error(&format!("Cannot serialize report: {}", e)),
            }
            return;
        }

        if self.is_visible(Level::Info) {
            let rows = [
                ("Files written", report.files_written.to_string()),
                ("Bytes written", format_bytes(report.bytes_written)),
                (
                    "Time taken",
                    format_duration(Duration::from_millis(report.duration_ms)),
                ),
                ("Skipped", report.scan.skipped().to_string()),
            ];
            for (label, value) in rows {
                println!("  {:<15}{}", format!("{}:", label), self.emphasize(value));
            }
            self.debug(report.display_summary().trim_end());
        }

        if report.has_read_errors() {
            self.warning(&format!(
                "{} files could not be read; see the error records in the output",
                report.read_errors.len()
            ));
        }

        if !self.quiet {
            println!("All code saved to: {}", report.output_path);
        }
    }

    /// Dry-run listing, one walk path per line in collection order.
    pub fn print_plan(&self, files: &[SourceFile]) {
        if self.mode == OutputMode::Json {
            let paths: Vec<String> = files.iter().map(SourceFile::display_path).collect();
            println!(
                "{}",
                serde_json::json!({ "type": "plan", "count": files.len(), "files": paths })
            );
            return;
        }

        for file in files {
            println!("{}", file.display_path());
        }
        self.info(&format!("{} files would be collected", files.len()));
    }

    fn is_visible(&self, level: Level) -> bool {
        match level.min_verbosity() {
            None => true,
            Some(min) => !self.quiet && self.verbose_level >= min,
        }
    }

    fn emit(&self, level: Level, message: &str) {
        if !self.is_visible(level) {
            return;
        }

        let line = match self.mode {
            OutputMode::Human => self.human_line(level, message),
            OutputMode::Plain => format!("{}: {}", level.label().to_uppercase(), message),
            OutputMode::Json => serde_json::json!({
                "type": "message",
                "level": level.label(),
                "message": message,
                "timestamp": chrono::Utc::now().to_rfc3339(),
            })
            .to_string(),
        };

        if level.goes_to_stderr() {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn human_line(&self, level: Level, message: &str) -> String {
        if !self.use_colors {
            return format!("{} {}", level.marker(), message);
        }

        let styled = match level {
            Level::Error => style(message).red().bold(),
            Level::Warning => style(message).yellow().bold(),
            Level::Suggestion | Level::Info => style(message).cyan(),
            Level::Start => style(message).bold(),
            Level::Debug => style(message).dim(),
        };
        format!("{} {}", level.marker(), styled)
    }

    fn emphasize(&self, text: String) -> String {
        if self.use_colors {
            style(text).cyan().bold().to_string()
        } else {
            text
        }
    }
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;

    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", bytes)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    match secs {
        0 => format!("{}ms", duration.as_millis()),
        1..=59 => format!("{}s", secs),
        _ => format!("{}m {}s", secs / 60, secs % 60),
    }
}
