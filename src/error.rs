//! Global error handling for compilebook
//!
//! This module provides a centralized error type that can represent errors
//! from every stage of a run: discovery, aggregation, rendering and writing.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::renderer::RenderError;

/// Global error type for compilebook operations
#[derive(Error, Debug)]
pub enum CompileBookError {
    /// The input directory does not exist or is not a directory
    #[error("Input directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// The input directory exists but could not be listed
    #[error("Failed to read directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chapter file could not be read
    #[error("Failed to read file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chapter file is not valid UTF-8
    #[error("File is not valid UTF-8: {}", .0.display())]
    Decode(PathBuf),

    /// Markdown to HTML conversion failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The output file could not be written
    #[error("Failed to write output file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Specialized Result type for compilebook operations
pub type Result<T> = std::result::Result<T, CompileBookError>;

/// Creates a CompileBookError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CompileBookError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

// Allow converting CompileBookError to io::Error for callers that only speak io
impl From<CompileBookError> for io::Error {
    fn from(err: CompileBookError) -> Self {
        io::Error::new(io::ErrorKind::Other, err.to_string())
    }
}
