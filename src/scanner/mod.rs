pub mod classifier;
pub mod file_filter;
pub mod source_scanner;

pub use classifier::{ContentClassifier, MimeClassifier};
pub use file_filter::FileFilter;
pub use source_scanner::{ScanStatistics, SourceFile, SourceScanner, SourceWalk};
