//! Error types for chapterize-core.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for chapterize.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed metadata: {0}")]
    MalformedMetadata(String),

    #[error("Continuation line {line_number} before any key: {line:?}")]
    DanglingContinuation { line_number: usize, line: String },

    #[error("Malformed chapter {index}: {reason}")]
    MalformedChapter { index: usize, reason: String },

    #[error("Invalid {field} in chapter {index}: {value:?}")]
    InvalidTimestamp {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("No resolvable duration for '{0}'")]
    MissingDuration(PathBuf),

    #[error("No usable track ordering tag on '{0}'")]
    MissingOrderingTag(PathBuf),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Command '{tool}' failed ({status:?}): {stderr}")]
    CommandFailed {
        tool: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("Command '{0}' produced no output where some was expected")]
    EmptyProbeOutput(String),

    #[error("External dependency '{0}' not found")]
    DependencyNotFound(String),

    #[error("No processable audio files found")]
    NoFilesFound,

    #[error("Invalid path: {0}")]
    PathError(String),
}

/// Result type for chapterize operations.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandFailed` error from an exit status and captured stderr.
pub fn command_failed_error(
    tool: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.into(),
        status: status.code(),
        stderr: stderr.into(),
    }
}

/// Builds a `CommandStart` error for a command that could not be spawned.
pub fn command_start_error(tool: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(tool.into(), err)
}
