//! Error types for cookie-vision-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for cookie-vision operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "capture region {region_width}x{region_height} does not fit the \
         {desktop_width}x{desktop_height} virtual desktop"
    )]
    Geometry {
        desktop_width: u32,
        desktop_height: u32,
        region_width: u32,
        region_height: u32,
    },

    #[error("dataset file not found: {0}")]
    NotFound(PathBuf),

    #[error("corrupt dataset file {path}: {reason}")]
    CorruptStore { path: PathBuf, reason: String },

    #[error("unexpected array in {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for cookie-vision operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for a `CorruptStore` error
    pub(crate) fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::CorruptStore {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
