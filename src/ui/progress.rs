use crate::collector::CollectionProgress;
use crate::ui::output::format_duration;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"];

/// Hands out spinners on stderr, or hidden bars when progress display is off.
pub struct ProgressManager {
    enabled: bool,
}

impl ProgressManager {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Record counter for the collection pass; the total is unknown while streaming.
    pub fn create_collect_progress(&self) -> ProgressBar {
        self.spinner(
            "{spinner:.green} [{elapsed_precise}] {pos} files {wide_msg}",
            "Scanning...",
        )
    }

    pub fn create_spinner(&self, message: &str) -> ProgressBar {
        self.spinner("{spinner:.green} {msg} ({elapsed})", message)
    }

    fn spinner(&self, template: &str, message: &str) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }

        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        let pb = ProgressBar::new_spinner()
            .with_style(style)
            .with_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

pub fn update_collect_progress(pb: &ProgressBar, progress: &CollectionProgress) {
    pb.set_position(progress.records() as u64);
    if let Some(ref current_file) = progress.current_file {
        pb.set_message(current_file.clone());
    }
}

pub fn finish_progress_with_summary(pb: &ProgressBar, message: &str, duration: Duration) {
    pb.finish_with_message(format!("{} (completed in {})", message, format_duration(duration)));
}
