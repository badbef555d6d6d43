//! Error types for the command-line tool.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Input file not found or not a regular file
    #[error("Input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// Output path equals one of the inputs
    #[error("Output {} would overwrite an input file", .0.display())]
    OutputOverwritesInput(PathBuf),

    /// Size limit out of range
    #[error("Invalid limit: {0}")]
    InvalidLimit(String),
}

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Failed to read an input file
    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed {
        /// Path that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write an output file
    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed {
        /// Path that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Input exceeds the configured size limit
    #[error("{} is {size} bytes, limit is {max}", path.display())]
    FileTooLarge {
        /// Offending file
        path: PathBuf,
        /// Actual size
        size: u64,
        /// Configured limit
        max: usize,
    },

    /// Failed to write the command report
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Metadata argument is not valid JSON
    #[error("Invalid metadata JSON: {0}")]
    InvalidMetadata(#[from] serde_json::Error),

    /// Container or payload error
    #[error(transparent)]
    Polaroid(#[from] polaroid_formats::PolaroidError),
}
