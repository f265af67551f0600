//! Error types for pipeline operations

use thiserror::Error;

/// Errors that can occur while building and laying out a graph
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Graph source failed to load input
    #[error("Source error: {0}")]
    Source(String),

    /// Worker error (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),

    /// I/O error reading a config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
