//! CLI error type.

use std::path::PathBuf;

use tableview_lib::error::{ConfigError, ExportError, ViewError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path}: {reason}")]
    InvalidData { path: PathBuf, reason: String },

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("table configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("export failed: {0}")]
    Export(#[from] ExportError),
}
