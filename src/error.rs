use std::time::Duration;
use thiserror::Error;

/// Main error type for reportree operations
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("File system error: {0}")]
    FileSystem(String),

    #[error("Rendering '{report}' failed: {message}")]
    Render { report: String, message: String },

    #[error("Rendering '{report}' timed out after {timeout:?}")]
    Timeout { report: String, timeout: Duration },
}

pub type Result<T> = std::result::Result<T, ReportError>;
