//! Errors raised while planning or executing a timeline.

use std::path::PathBuf;

use ritebite_common::RitebiteError;
use ritebite_edit_script::{ScriptError, SectionKind};

use crate::backend::BackendError;

/// Errors that can occur while assembling a timeline.
///
/// Segment indexes are positions in the script's per-kind collection.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error("Invalid frame range for {kind} segment {index}: end {end} is before start {start}")]
    InvalidFrameRange {
        kind: SectionKind,
        index: usize,
        start: i64,
        end: i64,
    },

    #[error("Frames of {kind} segment {index} run past the end of the timeline")]
    FrameOverflow { kind: SectionKind, index: usize },

    #[error("Clip {index} starts at source frame {start}; source frames are numbered from 1")]
    InvalidClipStart { index: usize, start: i64 },

    #[error("Backend failed during {operation}: {source}")]
    Backend {
        operation: &'static str,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Config(#[from] RitebiteError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type AssemblyResult<T> = std::result::Result<T, AssemblyError>;

impl AssemblyError {
    /// Wrap a backend failure with the operation that raised it.
    pub fn backend(operation: &'static str, source: BackendError) -> Self {
        Self::Backend { operation, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_names_operation() {
        let err = AssemblyError::backend("insert_text", BackendError::new("font missing"));
        assert_eq!(err.to_string(), "Backend failed during insert_text: font missing");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_script_errors_pass_through() {
        let err: AssemblyError = ScriptError::UnknownSectionKeyword {
            row: 3,
            keyword: "video".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Unknown section keyword \"video\" at row 3");
    }
}
