use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to load {}: {message}", path.display())]
    Load { path: PathBuf, message: String },

    #[error("Missing required column: '{0}'")]
    MissingColumn(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration file error: {0}")]
    ConfigFile(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProcessingError {
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ProcessingError::Load {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for the failures that mean the input table could not be read at all.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            ProcessingError::Load { .. } | ProcessingError::MissingColumn(_) | ProcessingError::Csv(_)
        )
    }
}
