use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeDumpError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid root directory: {path}")]
    InvalidRoot { path: String },

    #[error("Cannot write output file {path}: {source}")]
    OutputNotWritable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl CodeDumpError {
    pub fn invalid_root<P: AsRef<Path>>(path: P, reason: &str) -> Self {
        CodeDumpError::InvalidRoot {
            path: format!("{} ({})", path.as_ref().display(), reason),
        }
    }

    pub fn output_not_writable<P: AsRef<Path>>(path: P, source: std::io::Error) -> Self {
        CodeDumpError::OutputNotWritable {
            path: path.as_ref().display().to_string(),
            source,
        }
    }
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for CodeDumpError {
    fn user_message(&self) -> String {
        match self {
            CodeDumpError::InvalidRoot { path } => {
                format!("Cannot scan root directory: {}", path)
            }
            CodeDumpError::OutputNotWritable { path, source } => {
                format!("Cannot write output file {}: {}", path, source)
            }
            CodeDumpError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            CodeDumpError::InvalidPattern { pattern, reason } => {
                format!("Invalid exclude pattern '{}': {}", pattern, reason)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            CodeDumpError::InvalidRoot { .. } => Some(
                "Pass an existing, readable directory as ROOT or run from inside the project directory.".to_string()
            ),
            CodeDumpError::OutputNotWritable { .. } => Some(
                "Check that the output directory exists and is writable, or choose another path with --output.".to_string()
            ),
            CodeDumpError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            CodeDumpError::InvalidPattern { .. } => Some(
                "Exclude patterns use shell glob syntax, e.g. '.env.*' or '*.min.js'.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for CodeDumpError {
    fn from(error: toml::de::Error) -> Self {
        CodeDumpError::Config {
            message: error.to_string(),
        }
    }
}

impl From<globset::Error> for CodeDumpError {
    fn from(error: globset::Error) -> Self {
        CodeDumpError::InvalidPattern {
            pattern: error.glob().unwrap_or("<unknown>").to_string(),
            reason: error.kind().to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CodeDumpError>;
