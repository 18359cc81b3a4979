//! Error types for the renderer module

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Result type for render operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while converting markdown to HTML
#[derive(Error, Debug)]
pub enum RenderError {
    /// The conversion program could not be started
    #[error("Renderer unavailable: {program}: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The conversion program exited abnormally
    #[error("Renderer {program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The conversion program did not finish in time
    #[error("Renderer {program} timed out after {timeout:?}")]
    Timeout { program: String, timeout: Duration },

    /// The conversion produced output that is not valid UTF-8
    #[error("Renderer {0} produced invalid UTF-8 output")]
    Decode(String),

    /// The renderer command line is empty
    #[error("Renderer command is empty")]
    EmptyCommand,

    /// IO error while talking to the conversion program
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
