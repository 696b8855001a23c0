//! Errors raised while decoding an edit script.

use crate::segment::SectionKind;

/// Errors that can occur when splitting or decoding edit-script rows.
///
/// Row numbers are zero-based indexes into the full row list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScriptError {
    #[error("Malformed {kind} row {row}: {message}")]
    RowFormat {
        kind: SectionKind,
        row: usize,
        message: String,
    },

    #[error("Unknown section keyword {keyword:?} at row {row}")]
    UnknownSectionKeyword { row: usize, keyword: String },

    #[error("Invalid color hex {value:?}{}: expected complete hex byte pairs", at_row(.row))]
    InvalidColorHex { value: String, row: Option<usize> },

    #[error("Invalid frame range in {kind} row {row}: end {end} is before start {start}")]
    InvalidFrameRange {
        kind: SectionKind,
        row: usize,
        start: i64,
        end: i64,
    },
}

impl ScriptError {
    /// Row the error points at, if known.
    pub fn row(&self) -> Option<usize> {
        match self {
            ScriptError::RowFormat { row, .. }
            | ScriptError::UnknownSectionKeyword { row, .. }
            | ScriptError::InvalidFrameRange { row, .. } => Some(*row),
            ScriptError::InvalidColorHex { row, .. } => *row,
        }
    }

    /// Attach a row to a color error raised by the pure conversion helpers.
    pub(crate) fn with_row(self, at: usize) -> Self {
        match self {
            ScriptError::InvalidColorHex { value, .. } => ScriptError::InvalidColorHex {
                value,
                row: Some(at),
            },
            other => other,
        }
    }
}

fn at_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {r}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_kind_and_row() {
        let err = ScriptError::RowFormat {
            kind: SectionKind::Text,
            row: 12,
            message: "column 5 (size) is not a number".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed text row 12: column 5 (size) is not a number"
        );
        assert_eq!(err.row(), Some(12));
    }

    #[test]
    fn test_color_error_row_suffix() {
        let err = ScriptError::InvalidColorHex {
            value: "fff".to_string(),
            row: None,
        };
        assert_eq!(
            err.to_string(),
            "Invalid color hex \"fff\": expected complete hex byte pairs"
        );
        let err = err.with_row(4);
        assert_eq!(
            err.to_string(),
            "Invalid color hex \"fff\" at row 4: expected complete hex byte pairs"
        );
    }
}
