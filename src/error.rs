//! Error types for mda-diffusion

use std::path::PathBuf;

use thiserror::Error;

use crate::backend::BackendError;
use crate::syntax::HighlightError;

/// Result type alias for mda-diffusion operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse document '{}': {source}", .path.display())]
    Document {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid settings file '{}': {source}", .path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Highlighting setup failed: {0}")]
    Highlight(#[from] HighlightError),

    #[error("Computation failed: {0}")]
    Backend(#[from] BackendError),

    #[error("No results to save")]
    NoResults,

    #[error("Nothing loaded: {0}")]
    Missing(&'static str),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}
