pub mod file_collector;
pub mod record;
pub mod report;

pub use file_collector::{collect, CollectionProgress, Collector};
pub use record::Record;
pub use report::{CollectionReport, ConfigSnapshot, ReadFailure};
