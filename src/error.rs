//! Error types for the extent map

use thiserror::Error;

use crate::segment::StoreState;

pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Error, Debug)]
pub enum MapError {
    /// Growing the segment collection or the extent-size table failed.
    /// Every later query depends on a complete table, so callers normally
    /// abort on this; the library itself never terminates the process.
    #[error("Out of memory while growing {what} (requested {requested} more entries)")]
    OutOfMemory { what: &'static str, requested: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("Cannot {op} while segment store is {state:?}")]
    InvalidState { op: &'static str, state: StoreState },

    #[error("Layout violation: {0} overlapping segment pairs")]
    LayoutViolation(usize),

    #[error("{program} exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MapError {
    /// Stable error code, suitable for scripts wrapping the CLI.
    pub fn code(&self) -> &'static str {
        match self {
            MapError::OutOfMemory { .. } => "OUT_OF_MEMORY",
            MapError::InvalidArgument(_) => "INVALID_ARGUMENT",
            MapError::InvalidState { .. } => "INVALID_STATE",
            MapError::LayoutViolation(_) => "LAYOUT_VIOLATION",
            MapError::Command { .. } => "COMMAND_FAILED",
            _ => "INTERNAL_ERROR",
        }
    }

    /// True for errors after which the map must be considered unusable.
    pub fn is_fatal(&self) -> bool {
        matches!(self, MapError::OutOfMemory { .. })
    }
}

/// A collaborator row that matched neither recognized shape.
///
/// Soft error: logged and skipped, never aborts a reload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {reason}: {text:?}")]
pub struct MalformedRecord {
    /// 1-based line number in the collaborator's output.
    pub line: usize,
    pub text: String,
    pub reason: String,
}

impl MalformedRecord {
    pub fn new(line: usize, text: &str, reason: impl Into<String>) -> Self {
        Self {
            line,
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
