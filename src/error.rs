//! Common error types for tagsweep

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for tagsweep operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while sweeping a tree of audio files
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The tag container of a file could not be read
    #[error("Cannot open tags in {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    /// The tag container of a file could not be written back
    #[error("Cannot persist tags to {path}: {source}")]
    PersistFailed {
        path: PathBuf,
        #[source]
        source: id3::Error,
    },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A rule pattern failed to compile
    #[error("Invalid pattern: {0}")]
    Pattern(String),
}

impl Error {
    /// Path of the file this error is about, if it names one.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Error::OpenFailed { path, .. } | Error::PersistFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}
