//! Error kinds raised while discovering items and running linters.
//!
//! Every per-item variant is caught at the reporter boundary and turned into
//! a log line plus a failed run state. None of them terminates the process.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while linting a PBIP tree
#[derive(Error, Debug)]
pub enum LintError {
    #[error("Path {} does not exist.", .0.display())]
    PathNotFound(PathBuf),

    #[error("Malformed linter output: {0}")]
    MalformedOutput(String),

    #[error("Invalid rules file format: '{}'", .0.display())]
    InvalidRulesFile(PathBuf),

    #[error("{tool} timed out after {}s", .timeout.as_secs())]
    ToolTimeout { tool: String, timeout: Duration },

    #[error("{tool} failed: {message}")]
    ToolCrash { tool: String, message: String },

    #[error("{tool} not found. Please install it first.")]
    ToolNotFound { tool: String },

    #[error("Cannot read directory {}: {source}", .path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LintError {
    /// Wrap an IO error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LintError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        LintError::MalformedOutput(message.into())
    }
}
